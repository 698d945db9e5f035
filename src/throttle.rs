//! Trailing-edge throttle over caller-supplied instants.
//!
//! `trigger` arms a deadline one window after the call; repeated triggers push
//! the deadline out again. `poll` reports readiness once the window has passed
//! and disarms, so a burst of triggers yields a single firing. The throttle
//! never reads the clock itself, which keeps it deterministic under scripted
//! time.

use std::time::{Duration, Instant};

/// Window used by the gaps component to coalesce apply passes.
pub const DEFAULT_APPLY_THROTTLE: Duration = Duration::from_millis(30);

#[derive(Debug, Clone)]
pub struct Throttle {
    wait: Duration,
    deadline: Option<Instant>,
}

/// Outcome of a [`Throttle::trigger`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Nothing was pending; a new window started.
    Armed,
    /// A call was already pending and absorbed this one.
    Coalesced,
}

impl Throttle {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn set_wait(&mut self, wait: Duration) {
        self.wait = wait;
    }

    pub fn trigger(&mut self, now: Instant) -> TriggerOutcome {
        let outcome = if self.deadline.is_some() {
            TriggerOutcome::Coalesced
        } else {
            TriggerOutcome::Armed
        };
        self.deadline = Some(now + self.wait);
        outcome
    }

    /// True exactly once per armed window, when `now` has reached the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_APPLY_THROTTLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(30);

    #[test]
    fn first_trigger_is_deferred() {
        let start = Instant::now();
        let mut throttle = Throttle::new(WAIT);
        assert_eq!(throttle.trigger(start), TriggerOutcome::Armed);
        assert_eq!(throttle.deadline(), Some(start + WAIT));
        assert!(!throttle.poll(start));
        assert!(!throttle.poll(start + Duration::from_millis(29)));
        assert!(throttle.poll(start + WAIT));
        assert!(!throttle.is_pending());
    }

    #[test]
    fn burst_collapses_into_one_firing() {
        let start = Instant::now();
        let mut throttle = Throttle::new(WAIT);
        throttle.trigger(start);
        assert_eq!(
            throttle.trigger(start + Duration::from_millis(10)),
            TriggerOutcome::Coalesced
        );
        assert_eq!(
            throttle.trigger(start + Duration::from_millis(20)),
            TriggerOutcome::Coalesced
        );
        assert_eq!(throttle.deadline(), Some(start + Duration::from_millis(50)));

        assert!(!throttle.poll(start + Duration::from_millis(40)));
        assert!(throttle.poll(start + Duration::from_millis(50)));
        assert!(!throttle.poll(start + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_drops_pending_call() {
        let start = Instant::now();
        let mut throttle = Throttle::new(WAIT);
        throttle.trigger(start);
        throttle.cancel();
        assert_eq!(throttle.deadline(), None);
        assert!(!throttle.poll(start + WAIT));
    }

    #[test]
    fn zero_wait_fires_on_next_poll() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::ZERO);
        throttle.trigger(start);
        assert!(throttle.poll(start));
    }
}
