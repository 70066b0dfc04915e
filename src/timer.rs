//! Self-contained timers driven by caller-supplied elapsed time.
//! Nothing here reads the wall clock, which keeps the controller and the
//! command bridge deterministic under test.

/// Fixed-interval stepper - accumulates elapsed milliseconds and yields the
/// number of whole intervals that passed.
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    interval_ms: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            accumulator: 0.0,
        }
    }

    /// Add elapsed time, returns how many whole intervals elapsed.
    pub fn tick(&mut self, delta_ms: f32) -> u32 {
        self.accumulator += delta_ms;

        let steps = (self.accumulator / self.interval_ms) as u32;
        self.accumulator -= steps as f32 * self.interval_ms;
        steps
    }
}

/// Quiet-period debounce - arms on `poke()` and fires once no further pokes
/// arrive for the configured quiet window.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    quiet_ms: f32,
    since_poke: f32,
    armed: bool,
}

impl Debounce {
    pub fn new(quiet_ms: f32) -> Self {
        Self {
            quiet_ms,
            since_poke: 0.0,
            armed: false,
        }
    }

    /// Register activity, restarting the quiet window.
    pub fn poke(&mut self) {
        self.armed = true;
        self.since_poke = 0.0;
    }

    /// Advance time, returns true exactly once when the quiet window passes.
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        if !self.armed {
            return false;
        }

        self.since_poke += delta_ms;

        if self.since_poke >= self.quiet_ms {
            self.armed = false;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
