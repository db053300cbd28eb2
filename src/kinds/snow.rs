//! Snowfall: flakes drop from above the top edge with a sinusoidal sway.

use core::f32::consts::TAU;

use rand::Rng;

use crate::particle::{random_in, FrameContext, Particle};
use crate::surface::{Bounds, Canvas, Sprite, SpriteDraw};

pub const POPULATION_CAP: usize = 40;
pub const MAX_SPAWN_DELAY_MS: u64 = 400;

pub struct Snow {
    bounds: Bounds,
    sprite: Sprite,
    frame_interval_ms: u64,
    width: i32,
    height: i32,

    alpha: u8,
    rotation: i32,
    rotation_speed: i32,

    start_x: f32,
    start_y: f32,
    fall_speed: f32,
    sway: f32,
    sway_speed: f32,
    sway_amplitude: f32,
    spawn_ms: u64,

    x: i32,
    y: i32,
}

impl Snow {
    pub fn new(ctx: &mut FrameContext<'_>) -> Self {
        let mut flake = Self {
            bounds: ctx.env.bounds,
            sprite: ctx.env.sprite,
            frame_interval_ms: ctx.env.frame_interval_ms,
            width: 1,
            height: 1,
            alpha: 255,
            rotation: 0,
            rotation_speed: 0,
            start_x: 0.0,
            start_y: 0.0,
            fall_speed: 1.0,
            sway: 0.0,
            sway_speed: 0.0,
            sway_amplitude: 0.0,
            spawn_ms: ctx.now_ms,
            x: 0,
            y: 0,
        };
        flake.reset(ctx);
        flake
    }

    fn update_position(&mut self, now_ms: u64) {
        let ticks = now_ms.saturating_sub(self.spawn_ms) as f32 / self.frame_interval_ms.max(1) as f32;
        let phase = self.sway + self.sway_speed * ticks;
        self.x = (self.start_x + phase.sin() * self.sway_amplitude) as i32;
        self.y = (self.start_y + self.fall_speed * ticks) as i32;
    }
}

impl Particle for Snow {
    fn reset(&mut self, ctx: &mut FrameContext<'_>) {
        self.bounds = ctx.env.bounds;
        self.sprite = ctx.env.sprite;
        self.frame_interval_ms = ctx.env.frame_interval_ms;

        let rng = &mut *ctx.rng;
        let scale = random_in(rng, 3, 10) as f32 / 10.0;
        (self.width, self.height) = self.sprite.scaled(scale);
        self.alpha = random_in(rng, 120, 255) as u8;
        self.rotation = random_in(rng, 0, 359);
        self.rotation_speed = random_in(rng, 0, 2);

        self.start_x = random_in(rng, 0, self.bounds.width) as f32;
        self.start_y = -self.height as f32;
        // Larger flakes fall faster
        self.fall_speed = 0.5 + 2.0 * scale;
        self.sway = rng.random_range(0.0..TAU);
        self.sway_speed = rng.random_range(0.02..0.08);
        self.sway_amplitude = random_in(rng, 2, 12) as f32;
        self.spawn_ms = ctx.now_ms;
        self.x = self.start_x as i32;
        self.y = self.start_y as i32;
    }

    fn is_life_end(&self) -> bool {
        self.y > self.bounds.height + self.height
    }

    fn draw_next_frame(&mut self, canvas: &mut dyn Canvas, ctx: &mut FrameContext<'_>) {
        if self.y >= self.bounds.height + self.height {
            self.y += self.fall_speed.ceil() as i32;
            return;
        }

        self.update_position(ctx.now_ms);
        canvas.draw_sprite(&SpriteDraw {
            sprite: self.sprite,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation_deg: self.rotation,
            alpha: self.alpha,
        });
        self.rotation = (self.rotation + self.rotation_speed) % 360;
    }

    fn population_cap(&self) -> usize {
        POPULATION_CAP
    }

    fn max_spawn_delay_ms(&self) -> u64 {
        MAX_SPAWN_DELAY_MS
    }

    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{make_rng, SpawnEnv};

    struct NullCanvas;

    impl Canvas for NullCanvas {
        fn clear(&mut self) {}
        fn draw_sprite(&mut self, _draw: &SpriteDraw) {}
    }

    fn env() -> SpawnEnv {
        SpawnEnv {
            bounds: Bounds::new(320, 170),
            sprite: Sprite::new(2, 12, 12),
            frame_interval_ms: 16,
        }
    }

    #[test]
    fn flakes_start_above_the_canvas() {
        let env = env();
        let mut rng = make_rng(Some(4));
        for _ in 0..300 {
            let flake = Snow::new(&mut FrameContext { now_ms: 0, env: &env, rng: &mut rng });
            assert!(!flake.is_life_end());
            let (x, y) = flake.position();
            assert!(y < 0);
            assert!((0..=320).contains(&x));
        }
    }

    #[test]
    fn flakes_fall_through_and_end() {
        let env = env();
        let mut rng = make_rng(Some(6));
        let mut flake = Snow::new(&mut FrameContext { now_ms: 0, env: &env, rng: &mut rng });
        let mut last_y = flake.position().1;
        let mut ended = false;
        for tick in 1..=2_000u64 {
            if flake.is_life_end() {
                ended = true;
                break;
            }
            let mut ctx = FrameContext { now_ms: tick * 16, env: &env, rng: &mut rng };
            flake.draw_next_frame(&mut NullCanvas, &mut ctx);
            let y = flake.position().1;
            assert!(y >= last_y);
            last_y = y;
        }
        assert!(ended);
    }

    #[test]
    fn sway_stays_within_amplitude() {
        let env = env();
        let mut rng = make_rng(Some(12));
        let mut flake = Snow::new(&mut FrameContext { now_ms: 0, env: &env, rng: &mut rng });
        let origin = flake.start_x;
        for tick in 1..=50u64 {
            let mut ctx = FrameContext { now_ms: tick * 16, env: &env, rng: &mut rng };
            flake.draw_next_frame(&mut NullCanvas, &mut ctx);
            let dx = (flake.position().0 as f32 - origin).abs();
            assert!(dx <= flake.sway_amplitude + 1.0);
        }
    }
}
