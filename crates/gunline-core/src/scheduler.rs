//! Deterministic delayed-call queue.
//!
//! The firing core needs "call me back in N seconds" without an engine.
//! [`TimerQueue`] keeps pending tasks ordered by due time, with ties broken
//! by scheduling order, so replaying the same sequence of calls always pops
//! tasks in the same order.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Handle to a scheduled task, used for cancellation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Returns the raw sequence number of this handle.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerHandle({})", self.0)
    }
}

/// Pending tasks keyed by `(due, sequence)`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gunline_core::scheduler::TimerQueue;
///
/// let mut queue = TimerQueue::new();
/// queue.schedule_at(Duration::from_millis(200), "reset");
/// let shot = queue.schedule_at(Duration::from_millis(100), "shot");
///
/// assert_eq!(queue.next_due(), Some(Duration::from_millis(100)));
/// let (due, handle, task) = queue.pop_due(Duration::from_millis(150)).unwrap();
/// assert_eq!((due, handle, task), (Duration::from_millis(100), shot, "shot"));
/// assert!(queue.pop_due(Duration::from_millis(150)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Duration, u64), T>,
    next: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to become due at `due`.
    pub fn schedule_at(&mut self, due: Duration, task: T) -> TimerHandle {
        let seq = self.next;
        self.next += 1;
        self.entries.insert((due, seq), task);
        TimerHandle(seq)
    }

    /// Cancel a pending task. Returns the task if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let key = self
            .entries
            .keys()
            .find(|(_, seq)| *seq == handle.0)
            .copied()?;
        self.entries.remove(&key)
    }

    /// Returns `true` if the task behind `handle` has not fired or been
    /// cancelled.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.keys().any(|(_, seq)| *seq == handle.0)
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerHandle, T)> {
        let (&(due, _), _) = self.entries.first_key_value()?;
        if due > now {
            return None;
        }
        self.entries
            .pop_first()
            .map(|((due, seq), task)| (due, TimerHandle(seq), task))
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
