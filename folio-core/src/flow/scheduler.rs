//! Timer scheduling for flow playback
//!
//! A scheduler only hands out handles and reports which ones fired; the
//! reading session decides what a fired handle means. That keeps the timer
//! free of references back into the session.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Trait for one-shot timers
pub trait Scheduler: Send {
    /// Arrange for a new handle to fire after `delay`
    fn schedule_after(&mut self, delay: Duration) -> TimerHandle;

    /// Prevent a handle from firing; unknown or fired handles are ignored
    fn cancel(&mut self, handle: TimerHandle);
}

/// Virtual-clock scheduler driven explicitly by its owner
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerHandle, Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers that have not fired or been cancelled
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the next timer to fire
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().min().copied()
    }

    /// Fire the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let (&handle, &deadline) = self
            .pending
            .iter()
            .filter(|(_, &deadline)| deadline <= until)
            .min_by_key(|(&handle, &deadline)| (deadline, handle))?;
        self.pending.remove(&handle);
        self.now = self.now.max(deadline);
        Some(handle)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.insert(handle, self.now + delay);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.remove(&handle);
    }
}

/// Scheduler backed by tokio timers.
///
/// Fired handles arrive on the receiver returned by [`TokioScheduler::new`].
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    fired_tx: mpsc::UnboundedSender<TimerHandle>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerHandle>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            fired_tx,
            tasks: HashMap::new(),
        };
        (scheduler, fired_rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let fired_tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone once the session shuts down
            let _ = fired_tx.send(handle);
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}
