//! Cooperative UI-thread event loop: one-shot timers and posted tasks.
//!
//! Frames drive the loop with the classic pump:
//!
//! ```ignore
//! while !done() {
//!     if !event_loop.read_and_dispatch() {
//!         event_loop.sleep();
//!     }
//! }
//! ```
//!
//! [`EventLoop::read_and_dispatch`] runs at most one unit of work: the
//! earliest expired timer, otherwise the oldest posted task. Callbacks run
//! with no internal lock held, so they may schedule more work.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::TimerError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a scheduled one-shot timer.
    pub struct TimerId;
}

type Callback = Box<dyn FnOnce() + Send + 'static>;

struct TimerData {
    callback: Callback,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    seq: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.seq == other.seq
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; ties fire in scheduling order.
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct LoopState {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<TimerQueueEntry>,
    tasks: VecDeque<Callback>,
    next_seq: u64,
}

impl LoopState {
    /// Drop cancelled entries from the head of the timer queue.
    fn prune(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }

    fn take_expired(&mut self, now: Instant) -> Option<(TimerId, Callback)> {
        self.prune();
        let entry = *self.queue.peek()?;
        if entry.fire_time > now {
            return None;
        }
        self.queue.pop();
        self.timers
            .remove(entry.id)
            .map(|data| (entry.id, data.callback))
    }
}

/// The UI-thread event loop.
pub struct EventLoop {
    state: Mutex<LoopState>,
    max_sleep: Duration,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Create an empty event loop.
    pub fn new() -> Self {
        Self::with_max_sleep(Duration::from_millis(50))
    }

    /// Create an event loop whose [`sleep`](Self::sleep) never blocks longer
    /// than `max_sleep`.
    pub fn with_max_sleep(max_sleep: Duration) -> Self {
        Self {
            state: Mutex::new(LoopState::default()),
            max_sleep,
        }
    }

    /// Schedule `callback` to run once after `delay`.
    pub fn timer_exec<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock();
        let id = state.timers.insert(TimerData {
            callback: Box::new(callback),
        });
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push(TimerQueueEntry {
            id,
            fire_time: Instant::now() + delay,
            seq,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?delay, "timer scheduled");
        id
    }

    /// Cancel a timer that has not fired yet.
    pub fn cancel_timer(&self, id: TimerId) -> Result<(), TimerError> {
        match self.state.lock().timers.remove(id) {
            Some(_) => Ok(()),
            None => Err(TimerError::InvalidTimerId),
        }
    }

    /// Check whether a timer is still pending.
    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.state.lock().timers.contains_key(id)
    }

    /// Post a task to run on a later dispatch.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.state.lock().tasks.push_back(Box::new(task));
    }

    /// Whether any timer or task is outstanding.
    pub fn has_pending(&self) -> bool {
        let state = self.state.lock();
        !state.tasks.is_empty() || !state.timers.is_empty()
    }

    /// Run at most one unit of work. Returns `true` if something ran.
    pub fn read_and_dispatch(&self) -> bool {
        let work = {
            let mut state = self.state.lock();
            match state.take_expired(Instant::now()) {
                Some((id, callback)) => {
                    tracing::trace!(target: targets::TIMER, ?id, "timer fired");
                    Some(callback)
                }
                None => {
                    let task = state.tasks.pop_front();
                    if task.is_some() {
                        crate::foundation_trace!(remaining = state.tasks.len(), "running posted task");
                    }
                    task
                }
            }
        };

        match work {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Block until the next timer is due, bounded by the configured maximum.
    ///
    /// Returns `false` when nothing is scheduled at all, in which case no
    /// time is spent waiting; headless loops use this to stop instead of
    /// spinning.
    pub fn sleep(&self) -> bool {
        let wait = {
            let mut state = self.state.lock();
            if !state.tasks.is_empty() {
                return true;
            }
            state.prune();
            match state.queue.peek() {
                Some(entry) => entry.fire_time.saturating_duration_since(Instant::now()),
                None => {
                    crate::foundation_debug!("event loop idle, nothing scheduled");
                    return false;
                }
            }
        };

        if !wait.is_zero() {
            std::thread::sleep(wait.min(self.max_sleep));
        }
        true
    }
}

static_assertions::assert_impl_all!(EventLoop: Send, Sync);
