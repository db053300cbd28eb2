//! Runtime knobs consumed by the scheduler and the pool

use core::time::Duration;

/// All configuration for one effect controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    // Timing
    /// Delay before the first tick of a drawing session.
    pub startup_delay_ms: u64,
    /// Steady-state spacing between draw ticks.
    pub frame_interval_ms: u64,

    // Display bounds read once at construction; later changes go
    // through `EffectController::resize`
    pub screen_width: i32,
    pub screen_height: i32,

    // Pool storage, applied on top of each kind's own population cap
    pub pool_capacity: usize,

    /// `None` seeds from OS entropy. `Some` reseeds the pool on every start.
    pub rng_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            startup_delay_ms: 100,
            frame_interval_ms: 16,
            screen_width: 320,
            screen_height: 170,
            pool_capacity: 64,
            rng_seed: None,
        }
    }
}

impl Settings {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Never zero, so a misconfigured interval cannot spin the ticking thread.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}
