//! Core systems for Horizon Foundation.
//!
//! This crate provides the building blocks of the foundation layer:
//!
//! - **Signal/Slot System**: change notification between controls and listeners
//! - **Meta-Object System**: named methods and fields registered per type,
//!   the basis for name-based binding without runtime reflection
//! - **Values**: the dynamically typed [`Value`] passed through meta-objects
//! - **Event Loop**: one-shot timers and posted tasks on the UI thread
//! - **Logging**: tracing targets, object dumps and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_foundation_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Event Loop Example
//!
//! ```
//! use horizon_foundation_core::EventLoop;
//! use std::time::Duration;
//!
//! let event_loop = EventLoop::new();
//! event_loop.timer_exec(Duration::ZERO, || println!("timer fired"));
//! event_loop.post(|| println!("task ran"));
//!
//! while event_loop.read_and_dispatch() {}
//! ```

mod error;
pub mod event_loop;
pub mod logging;
pub mod meta;
pub mod signal;
pub mod value;

pub use error::{CoreError, Result, SignalError, TimerError};
pub use event_loop::{EventLoop, TimerId};
pub use logging::{DumpOptions, ObjectDump, PerfSpan};
pub use meta::{
    FieldMeta, MetaError, MetaObject, MetaObjectBuilder, MetaResult, MethodMeta, Reflect,
    SharedObject, shared,
};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use value::{FromValue, IntoValue, Value};
