use super::constants::DAY;

/// Fixed timestep accumulator.
/// Turns variable frame times into a whole number of simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Real seconds per tick.
    dt: f64,
    /// Leftover real time not yet consumed by a tick.
    accumulator: f64,
    /// Upper bound on ticks per frame.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self::with_max_steps(dt, 10)
    }

    pub fn with_max_steps(dt: f64, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of ticks to run.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // A long stall (tab in background) must not queue up hundreds of ticks.
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f64);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f64 * self.dt;
        steps
    }

    /// Fraction of a tick left in the accumulator (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Drop any partial tick, e.g. when resuming from pause.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Simulated time elapsed since the system was built.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    steps: u64,
    seconds: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one simulation step of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.steps += 1;
        self.seconds += dt;
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn days(&self) -> f64 {
        self.seconds / DAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_max_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
        let mut ts = FixedTimestep::with_max_steps(1.0 / 60.0, 3);
        assert_eq!(ts.accumulate(1.0), 3);
    }

    #[test]
    fn negative_frame_time_is_ignored() {
        let mut ts = FixedTimestep::new(0.1);
        assert_eq!(ts.accumulate(-5.0), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn reset_drops_partial_tick() {
        let mut ts = FixedTimestep::new(0.1);
        ts.accumulate(0.05);
        assert!(ts.alpha() > 0.4);
        ts.reset();
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn clock_tracks_days() {
        let mut clock = SimClock::new();
        for _ in 0..3 {
            clock.advance(10.0 * DAY);
        }
        assert_eq!(clock.steps(), 3);
        assert!((clock.days() - 30.0).abs() < 1e-9);
    }
}
