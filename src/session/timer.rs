use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingAdvance {
    session_id: u64,
    due: Instant,
}

/// The delayed "move to next question" step after an answer. At most one is
/// pending; it only fires for the session that scheduled it.
#[derive(Debug, Default)]
pub struct AdvanceTimer {
    pending: Option<PendingAdvance>,
}

impl AdvanceTimer {
    pub fn schedule(&mut self, session_id: u64, now: Instant, delay: Duration) {
        self.pending = Some(PendingAdvance {
            session_id,
            due: now + delay,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending_for(&self, session_id: u64) -> bool {
        self.pending.is_some_and(|p| p.session_id == session_id)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Consume a due advance. Returns true only when it belongs to
    /// `active_session`; a due advance for any other session is dropped.
    pub fn take_due(&mut self, active_session: u64, now: Instant) -> bool {
        match self.pending {
            Some(p) if now >= p.due => {
                self.pending = None;
                p.session_id == active_session
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn fires_once_after_delay() {
        let t0 = Instant::now();
        let mut timer = AdvanceTimer::default();
        timer.schedule(1, t0, DELAY);
        assert!(!timer.take_due(1, t0 + Duration::from_millis(999)));
        assert!(timer.take_due(1, t0 + DELAY));
        assert!(!timer.take_due(1, t0 + DELAY * 2));
    }

    #[test]
    fn stale_session_is_dropped() {
        let t0 = Instant::now();
        let mut timer = AdvanceTimer::default();
        timer.schedule(1, t0, DELAY);
        assert!(!timer.take_due(2, t0 + DELAY));
        assert!(!timer.is_pending_for(1));
    }

    #[test]
    fn cancel_clears_pending() {
        let t0 = Instant::now();
        let mut timer = AdvanceTimer::default();
        timer.schedule(4, t0, DELAY);
        assert!(timer.is_pending_for(4));
        timer.cancel();
        assert!(timer.remaining(t0).is_none());
        assert!(!timer.take_due(4, t0 + DELAY));
    }

    #[test]
    fn remaining_counts_down() {
        let t0 = Instant::now();
        let mut timer = AdvanceTimer::default();
        timer.schedule(1, t0, DELAY);
        assert_eq!(timer.remaining(t0 + Duration::from_millis(400)), Some(Duration::from_millis(600)));
        assert_eq!(timer.remaining(t0 + DELAY * 3), Some(Duration::ZERO));
    }
}
