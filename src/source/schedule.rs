//! Cancellable fixed-period task handle.
//!
//! The handle owns the only record of the schedule. Cancelling drops the
//! next deadline, so cancellation is a plain state change and repeat calls
//! do nothing. Time is passed in, never read, which keeps the schedule
//! deterministic under test.

use std::time::{Duration, Instant};

/// Smallest period accepted; shorter periods are raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A repeating deadline with an explicit handle.
///
/// # States
/// - Idle: never started, `next_due() == None`
/// - Active: `next_due() == Some(_)`
/// - Cancelled: `next_due() == None`, cannot be restarted
#[derive(Debug, Clone)]
pub struct IntervalTask {
    period: Duration,
    next_due: Option<Instant>,
    cancelled: bool,
}

impl IntervalTask {
    /// New idle task ticking every `period`.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next_due: None,
            cancelled: false,
        }
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the task: the first tick is due one period after `now`.
    ///
    /// Returns false if the task is already active or was cancelled.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.cancelled || self.next_due.is_some() {
            return false;
        }
        self.next_due = Some(now + self.period);
        true
    }

    /// Whether ticks are still scheduled.
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Deadline of the next tick.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Time left until the next tick; zero if overdue, `None` if inactive.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
    }

    /// Count the ticks that have come due by `now` and advance past them.
    ///
    /// A caller that fell behind gets every missed tick at once, so the
    /// schedule never drifts and never drops a tick.
    pub fn poll_due(&mut self, now: Instant) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let behind = now.duration_since(due).as_nanos() / self.period.as_nanos();
        let ticks = u32::try_from(behind.saturating_add(1)).unwrap_or(u32::MAX);
        self.next_due = Some(due + self.period * ticks);
        ticks
    }

    /// Stop ticking for good. Returns true only if the task was active.
    pub fn cancel(&mut self) -> bool {
        self.cancelled = true;
        self.next_due.take().is_some()
    }
}
