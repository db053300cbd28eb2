//! Petal fall: each petal follows a randomized quadratic curve from the top
//! edge to the left edge, or from the right edge to the bottom edge.

use glam::Vec2;
use rand::Rng;

use crate::curve::quadratic_point;
use crate::particle::{random_in, FrameContext, Particle};
use crate::surface::{Bounds, Canvas, Sprite, SpriteDraw};

pub const POPULATION_CAP: usize = 30;
pub const MAX_SPAWN_DELAY_MS: u64 = 1000;

pub struct Sakura {
    bounds: Bounds,
    sprite: Sprite,
    frame_interval_ms: u64,

    // Scaled sprite size
    width: i32,
    height: i32,

    scale: f32,
    alpha: u8,
    rotation: i32,
    rotation_speed: i32,
    speed: i32,

    // Curve start, control and end points
    start: Vec2,
    control: Vec2,
    end: Vec2,
    spawn_ms: u64,

    x: i32,
    y: i32,
}

impl Sakura {
    pub fn new(ctx: &mut FrameContext<'_>) -> Self {
        let mut petal = Self {
            bounds: ctx.env.bounds,
            sprite: ctx.env.sprite,
            frame_interval_ms: ctx.env.frame_interval_ms,
            width: 1,
            height: 1,
            scale: 1.0,
            alpha: 255,
            rotation: 0,
            rotation_speed: 1,
            speed: 1,
            start: Vec2::ZERO,
            control: Vec2::ZERO,
            end: Vec2::ZERO,
            spawn_ms: ctx.now_ms,
            x: 0,
            y: 0,
        };
        petal.reset(ctx);
        petal
    }

    /// Progress factor along the curve.
    // COMPAT: unclamped; the curve keeps extrapolating past t = 1 until the
    // edge check retires the petal.
    fn progress(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.spawn_ms) as f32;
        let distance = (self.start.x - self.end.x).max(1.0);
        elapsed / self.frame_interval_ms.max(1) as f32 * self.speed as f32 / distance
    }

    fn update_position(&mut self, now_ms: u64) {
        let p = quadratic_point(self.progress(now_ms), self.start, self.control, self.end);
        self.x = p.x as i32;
        self.y = p.y as i32;
    }

    fn past_safety_bound(&self) -> bool {
        self.x.abs() as f32 > 1.5 * self.bounds.width as f32
            || self.y as f32 > 1.5 * self.bounds.height as f32
    }
}

impl Particle for Sakura {
    fn reset(&mut self, ctx: &mut FrameContext<'_>) {
        self.bounds = ctx.env.bounds;
        self.sprite = ctx.env.sprite;
        self.frame_interval_ms = ctx.env.frame_interval_ms;

        let rng = &mut *ctx.rng;
        self.scale = random_in(rng, 1, 10) as f32 / 10.0;
        self.alpha = random_in(rng, 50, 255) as u8;
        (self.width, self.height) = self.sprite.scaled(self.scale);

        let (w, h) = (self.bounds.width, self.bounds.height);
        if rng.random_bool(0.5) {
            // top -> left
            let start_x = random_in(rng, w / 4, w);
            let end_y = random_in(rng, h / 5, h);
            self.start = Vec2::new(start_x as f32, -self.height as f32);
            self.end = Vec2::new(-self.width as f32, end_y as f32);
            self.control = Vec2::new(
                random_in(rng, 1, start_x) as f32,
                random_in(rng, 1, end_y) as f32,
            );
        } else {
            // right -> bottom
            let start_y = random_in(rng, -self.height, h * 3 / 5);
            let end_x = random_in(rng, 0, w * 3 / 4);
            self.start = Vec2::new(w as f32, start_y as f32);
            self.end = Vec2::new(end_x as f32, (h + self.height) as f32);
            self.control = Vec2::new(
                random_in(rng, 1, w) as f32,
                random_in(rng, start_y, h) as f32,
            );
        }

        self.rotation = random_in(rng, 0, 359);
        self.rotation_speed = random_in(rng, 1, 3);
        self.speed = random_in(rng, 1, 2);
        self.spawn_ms = ctx.now_ms;
        self.x = self.start.x as i32;
        self.y = self.start.y as i32;
    }

    fn is_life_end(&self) -> bool {
        self.x < -self.width || self.y > self.bounds.height + self.height
    }

    fn draw_next_frame(&mut self, canvas: &mut dyn Canvas, ctx: &mut FrameContext<'_>) {
        // Keep moving off-canvas so the pool retires it on the next pass
        if self.x <= -self.width {
            self.x -= self.speed;
            return;
        }
        if self.y >= self.bounds.height + self.height {
            self.y += self.speed;
            return;
        }
        if self.past_safety_bound() {
            self.reset(ctx);
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
