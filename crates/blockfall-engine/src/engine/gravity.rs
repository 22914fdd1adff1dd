/// Accumulates elapsed wall-clock time and decides when the next automatic
/// downward step is due.
///
/// The accumulator resets to zero when it fires rather than subtracting the
/// interval, so a long stall between ticks causes a single drop instead of a
/// burst of catch-up drops.
#[derive(Debug, Clone, Default)]
pub struct DropScheduler {
    accumulator_ms: f64,
}

impl DropScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed_ms` to the accumulator; returns `true` (and resets)
    /// when the accumulator exceeds `interval_ms`. Fires at most once per
    /// call.
    pub fn advance(&mut self, elapsed_ms: f64, interval_ms: u32) -> bool {
        self.accumulator_ms += elapsed_ms;
        if self.accumulator_ms > f64::from(interval_ms) {
            self.accumulator_ms = 0.0;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_interval_is_exceeded() {
        let mut scheduler = DropScheduler::new();
        assert!(!scheduler.advance(400.0, 1000));
        assert!(!scheduler.advance(600.0, 1000));
        assert!(scheduler.advance(0.5, 1000));
    }

    #[test]
    fn accumulator_resets_to_zero_not_by_interval() {
        let mut scheduler = DropScheduler::new();
        // A very long stall still produces exactly one drop.
        assert!(scheduler.advance(10_000.0, 1000));
        assert!(!scheduler.advance(999.0, 1000));
        assert!(scheduler.advance(2.0, 1000));
    }

    #[test]
    fn reset_discards_accumulated_time() {
        let mut scheduler = DropScheduler::new();
        assert!(!scheduler.advance(900.0, 1000));
        scheduler.reset();
        assert!(!scheduler.advance(900.0, 1000));
    }
}
