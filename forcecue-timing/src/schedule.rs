use std::time::Duration;

/// A periodic deadline polled from a single thread, with interval semantics:
/// the first firing is one period after scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatingTask {
    period_ns: u64,
    next_due: u64,
}

impl RepeatingTask {
    pub fn new(period: Duration, now: u64) -> Self {
        let period_ns = (period.as_nanos() as u64).max(1);
        Self {
            period_ns,
            next_due: now.saturating_add(period_ns),
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_nanos(self.period_ns)
    }

    pub fn next_due(&self) -> u64 {
        self.next_due
    }

    /// Fires at most once per call. Missed periods are skipped without
    /// shifting the phase.
    pub fn fire_if_due(&mut self, now: u64) -> bool {
        if now < self.next_due {
            return false;
        }
        let missed = (now - self.next_due) / self.period_ns;
        self.next_due += (missed + 1) * self.period_ns;
        true
    }

    /// Replaces the period and restarts the phase from `now`.
    pub fn reschedule(&mut self, period: Duration, now: u64) {
        *self = Self::new(period, now);
    }

    pub fn until_due(&self, now: u64) -> Duration {
        Duration::from_nanos(self.next_due.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn first_fire_after_one_period() {
        let mut task = RepeatingTask::new(Duration::from_millis(50), 0);
        assert!(!task.fire_if_due(49 * MS));
        assert!(task.fire_if_due(50 * MS));
        assert!(!task.fire_if_due(60 * MS));
        assert!(task.fire_if_due(100 * MS));
    }

    #[test]
    fn missed_periods_fire_once() {
        let mut task = RepeatingTask::new(Duration::from_millis(50), 0);
        assert!(task.fire_if_due(275 * MS));
        assert_eq!(task.next_due(), 300 * MS);
        assert!(!task.fire_if_due(299 * MS));
    }

    #[test]
    fn reschedule_restarts_phase() {
        let mut task = RepeatingTask::new(Duration::from_secs(1), 0);
        task.reschedule(Duration::from_millis(150), 400 * MS);
        assert_eq!(task.period(), Duration::from_millis(150));
        assert_eq!(task.next_due(), 550 * MS);
        assert_eq!(task.until_due(500 * MS), Duration::from_millis(50));
    }
}
