//! Capability set shared by every particle kind

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::surface::{Bounds, Canvas, Sprite};

pub type ParticleRng = StdRng;

pub fn make_rng(seed: Option<u64>) -> ParticleRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Uniform integer in `[lo, hi]`, collapsing to `lo` on an empty range
/// (e.g. a zero-sized surface before the first resize).
pub fn random_in(rng: &mut ParticleRng, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        lo
    } else {
        rng.random_range(lo..=hi)
    }
}

/// What a particle reads at `reset` time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnEnv {
    pub bounds: Bounds,
    pub sprite: Sprite,
    pub frame_interval_ms: u64,
}

/// Per-frame inputs handed to particles by the pool.
pub struct FrameContext<'a> {
    /// Monotonic milliseconds.
    pub now_ms: u64,
    pub env: &'a SpawnEnv,
    pub rng: &'a mut ParticleRng,
}

/// One animated instance. Kinds implement this; the pool only talks to it
/// through these calls.
pub trait Particle: Send {
    /// Re-randomize every parameter and restart the lifetime clock at
    /// `ctx.now_ms`. After this, `is_life_end` is false.
    fn reset(&mut self, ctx: &mut FrameContext<'_>);

    fn is_life_end(&self) -> bool;

    /// Advance to `ctx.now_ms` and draw. May skip drawing while the
    /// particle is leaving the canvas.
    fn draw_next_frame(&mut self, canvas: &mut dyn Canvas, ctx: &mut FrameContext<'_>);

    fn population_cap(&self) -> usize;

    fn max_spawn_delay_ms(&self) -> u64;

    /// Current draw-space top-left corner.
    fn position(&self) -> (i32, i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_in_is_inclusive_and_bounded() {
        let mut rng = make_rng(Some(42));
        let mut seen_hi = false;
        for _ in 0..1000 {
            let v = random_in(&mut rng, 1, 3);
            assert!((1..=3).contains(&v));
            seen_hi |= v == 3;
        }
        assert!(seen_hi);
    }

    #[test]
    fn random_in_empty_range_collapses() {
        let mut rng = make_rng(Some(7));
        assert_eq!(random_in(&mut rng, 5, 5), 5);
        assert_eq!(random_in(&mut rng, 5, -2), 5);
    }

    #[test]
    fn seeded_rngs_repeat() {
        let mut a = make_rng(Some(99));
        let mut b = make_rng(Some(99));
        for _ in 0..10 {
            assert_eq!(random_in(&mut a, 0, 1000), random_in(&mut b, 0, 1000));
        }
    }
}
