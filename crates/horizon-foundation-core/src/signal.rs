//! Signal/slot system for Horizon Foundation.
//!
//! Controls announce state changes (text modified, painted, disposed,
//! selected) through signals. Every slot runs directly on the emitting
//! thread, which is always the UI thread in this crate family.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type used for notifications
//! - [`ConnectionId`] - Identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Re-entrancy
//!
//! `emit` snapshots the connected slots and releases its lock before calling
//! them. A slot may therefore connect, disconnect or emit on the same signal.
//! Slots disconnected during an emission still receive that emission.
//!
//! # Example
//!
//! ```
//! use horizon_foundation_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// The ID remains valid until the connection is explicitly disconnected
    /// or the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type Connections<Args> = Mutex<SlotMap<ConnectionId, Slot<Args>>>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments.
pub struct Signal<Args> {
    connections: Arc<Connections<Args>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    ///
    /// The guard does not keep the signal alive. Dropping it after the signal
    /// is gone does nothing.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            connections: Arc::downgrade(&self.connections),
            id: Some(id),
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. Used while a control's
    /// state is set programmatically and listeners must not react.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    #[tracing::instrument(skip_all, target = "horizon_foundation_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`]. Holds only a weak reference to
/// the signal's connection table.
///
/// # Example
///
/// ```
/// use horizon_foundation_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);
/// }
/// signal.emit(43);
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args> {
    connections: Weak<Connections<Args>>,
    id: Option<ConnectionId>,
}

impl<Args> ConnectionGuard<Args> {
    /// The connection this guard owns, if it is still held.
    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// Whether the connection is still registered with a live signal.
    pub fn is_connected(&self) -> bool {
        match (self.id, self.connections.upgrade()) {
            (Some(id), Some(connections)) => connections.lock().contains_key(id),
            _ => false,
        }
    }

    /// Disconnect now instead of on drop.
    pub fn disconnect(&mut self) -> Result<(), SignalError> {
        let id = self.id.take().ok_or(SignalError::InvalidConnection)?;
        let connections = self.connections.upgrade().ok_or(SignalError::SignalDropped)?;
        if connections.lock().remove(id).is_some() {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let (Some(id), Some(connections)) = (self.id.take(), self.connections.upgrade()) {
            connections.lock().remove(id);
        }
    }
}

impl<Args> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.lock(), vec![1, 3]);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let received_clone = received.clone();
            let guard = signal.connect_scoped(move |&value| {
                received_clone.lock().push(value);
            });
            assert!(guard.is_connected());
            signal.emit(1);
        }

        signal.emit(2);
        assert_eq!(*received.lock(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard_outlives_signal() {
        let signal = Signal::<()>::new();
        let mut guard = signal.connect_scoped(|_| {});
        drop(signal);

        assert!(!guard.is_connected());
        assert_eq!(guard.disconnect(), Err(SignalError::SignalDropped));
    }

    #[test]
    fn test_explicit_guard_disconnect() {
        let signal = Signal::<()>::new();
        let mut guard = signal.connect_scoped(|_| {});

        assert_eq!(guard.disconnect(), Ok(()));
        assert_eq!(guard.disconnect(), Err(SignalError::InvalidConnection));
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_can_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let calls = Arc::new(Mutex::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let signal_clone = signal.clone();
        let calls_clone = calls.clone();
        let own_id_clone = own_id.clone();
        let id = signal.connect(move |_| {
            *calls_clone.lock() += 1;
            if let Some(id) = *own_id_clone.lock() {
                signal_clone.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());

        assert_eq!(*calls.lock(), 1);
        assert_eq!(signal.connection_count(), 0);
    }
}
