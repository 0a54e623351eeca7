/// Fixed-interval accumulator.
/// Turns variable frame deltas into a count of elapsed whole intervals,
/// e.g. "re-read the clock every 60 seconds".
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    /// Length of one interval in seconds.
    interval: f32,
    /// Accumulated time since the last full interval.
    accumulator: f32,
}

impl IntervalTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            accumulator: 0.0,
        }
    }

    /// Add frame time. Returns how many intervals completed (at most one;
    /// a long stall fires once rather than replaying every missed interval).
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        if self.accumulator < self.interval {
            return 0;
        }
        self.accumulator %= self.interval;
        1
    }

    /// Progress toward the next interval (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.interval
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_exact_interval() {
        let mut timer = IntervalTimer::new(60.0);
        assert_eq!(timer.accumulate(60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut timer = IntervalTimer::new(1.0);
        assert_eq!(timer.accumulate(0.6), 0);
        assert_eq!(timer.accumulate(0.6), 1);
        assert!((timer.alpha() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn long_stall_fires_once() {
        let mut timer = IntervalTimer::new(1.0);
        assert_eq!(timer.accumulate(10.5), 1);
        assert!(timer.alpha() < 1.0);
    }

    #[test]
    fn ignores_non_positive_deltas() {
        let mut timer = IntervalTimer::new(1.0);
        assert_eq!(timer.accumulate(-3.0), 0);
        assert_eq!(timer.alpha(), 0.0);
        timer.accumulate(0.5);
        timer.reset();
        assert_eq!(timer.alpha(), 0.0);
    }
}
