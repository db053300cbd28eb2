//! Bounded particle pool for the active effect kind, with staggered spawning
//! and in-place recycling of finished particles.

use heapless::Vec;
use rand::Rng;

use crate::kinds::EffectKind;
use crate::particle::{FrameContext, Particle, ParticleRng, SpawnEnv};
use crate::surface::{Bounds, Canvas, Sprite};

/// Storage is fixed at `MAX_PARTICLES`; the effective population cap is the
/// smaller of that, the requested capacity and the kind's own cap.
pub struct ParticlePool<const MAX_PARTICLES: usize> {
    particles: Vec<Box<dyn Particle>, MAX_PARTICLES>,
    kind: Option<EffectKind>,

    // Spawn admission
    max_num: usize,
    max_add_delay_ms: u64,
    last_spawn_ms: Option<u64>,
    next_spawn_delay_ms: u64,

    env: SpawnEnv,
    rng: ParticleRng,
}

impl<const MAX_PARTICLES: usize> ParticlePool<MAX_PARTICLES> {
    pub fn new(env: SpawnEnv, rng: ParticleRng) -> Self {
        Self {
            particles: Vec::new(),
            kind: None,
            max_num: 0,
            max_add_delay_ms: 0,
            last_spawn_ms: None,
            next_spawn_delay_ms: 0,
            env,
            rng,
        }
    }

    /// Drop every particle and switch to `kind`. The first particle is
    /// admitted on the next frame.
    pub fn initialize(&mut self, kind: EffectKind, sprite: Sprite, capacity: usize) {
        self.particles.clear();
        self.kind = Some(kind);
        self.max_num = kind.population_cap().min(capacity).min(MAX_PARTICLES);
        self.max_add_delay_ms = kind.max_spawn_delay_ms();
        self.last_spawn_ms = None;
        self.next_spawn_delay_ms = 0;
        self.env.sprite = sprite;
        log::debug!("pool initialized for {kind}, max {} particles", self.max_num);
    }

    /// Picked up by particles on their next reset.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.env.bounds = bounds;
    }

    /// Replace the random source, e.g. to replay a seeded run.
    pub fn reseed(&mut self, rng: ParticleRng) {
        self.rng = rng;
    }

    pub fn set_frame_interval_ms(&mut self, frame_interval_ms: u64) {
        self.env.frame_interval_ms = frame_interval_ms;
    }

    pub fn kind(&self) -> Option<EffectKind> {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn max_num(&self) -> usize {
        self.max_num
    }

    pub fn env(&self) -> &SpawnEnv {
        &self.env
    }

    /// Advance and draw every live particle in insertion order, retiring or
    /// recycling finished ones, then admit at most one new particle.
    pub fn advance_and_draw(&mut self, canvas: &mut dyn Canvas, now_ms: u64) {
        let Some(kind) = self.kind else {
            return;
        };

        let mut index = 0;
        while index < self.particles.len() {
            let recycle = if self.particles[index].is_life_end() {
                if !self.spawn_due(now_ms) {
                    self.particles.remove(index);
                    continue;
                }
                true
            } else {
                false
            };

            let mut ctx = FrameContext {
                now_ms,
                env: &self.env,
                rng: &mut self.rng,
            };
            let particle = &mut self.particles[index];
            if recycle {
                particle.reset(&mut ctx);
            }
            particle.draw_next_frame(canvas, &mut ctx);

            if recycle {
                self.mark_spawned(now_ms);
            }
            index += 1;
        }

        if self.particles.len() < self.max_num && self.spawn_due(now_ms) {
            let mut ctx = FrameContext {
                now_ms,
                env: &self.env,
                rng: &mut self.rng,
            };
            let particle = kind.spawn(&mut ctx);
            if self.particles.push(particle).is_ok() {
                self.mark_spawned(now_ms);
                log::trace!("spawned {kind} particle, population {}", self.particles.len());
            }
        }
    }

    fn spawn_due(&self, now_ms: u64) -> bool {
        match self.last_spawn_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.next_spawn_delay_ms,
        }
    }

    fn mark_spawned(&mut self, now_ms: u64) {
        self.last_spawn_ms = Some(now_ms);
        self.next_spawn_delay_ms = self.rng.random_range(0..=self.max_add_delay_ms);
    }
}
