//! Trailing-edge debounce over caller-supplied time.
//!
//! The debouncer never reads a clock. Callers pass `now` as a [`Duration`]
//! since any fixed origin (`tokio::time::Instant::elapsed` in the server,
//! hand-written values in tests), which keeps the timing logic testable by
//! advancing simulated time.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, pushing any pending deadline out to `now + delay`.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    /// Pending deadline, if armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once when the deadline has been reached, disarming the
    /// timer.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn idle_debouncer_never_fires() {
        let mut d = Debouncer::new(MS * 100);
        assert!(!d.poll(Duration::from_secs(60)));
    }

    #[test]
    fn fires_once_after_delay() {
        let mut d = Debouncer::new(MS * 100);
        d.trigger(Duration::ZERO);
        assert!(!d.poll(MS * 99));
        assert!(d.poll(MS * 100));
        assert!(!d.poll(MS * 200));
    }

    #[test]
    fn bursts_collapse_into_one_firing() {
        let mut d = Debouncer::new(MS * 100);
        d.trigger(Duration::ZERO);
        d.trigger(MS * 50);
        d.trigger(MS * 90);
        assert!(!d.poll(MS * 150));
        assert_eq!(d.deadline(), Some(MS * 190));
        assert!(d.poll(MS * 190));
    }

    #[test]
    fn cancel_disarms() {
        let mut d = Debouncer::new(MS * 10);
        d.trigger(Duration::ZERO);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.poll(MS * 50));
    }
}
