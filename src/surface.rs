//! Drawing surface seam: what the host window layer provides and what
//! particles draw onto.

use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    primitives::{PrimitiveStyle, Triangle},
};
use glam::Vec2;

use crate::error::SurfaceError;

/// Drawing surface extent in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Opaque handle to a sprite owned by the host, with its unscaled size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

impl Sprite {
    pub const fn new(id: u32, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Pixel size after scaling, never below 1x1.
    pub fn scaled(&self, scale: f32) -> (i32, i32) {
        let w = (self.width as f32 * scale) as i32;
        let h = (self.height as f32 * scale) as i32;
        (w.max(1), h.max(1))
    }
}

/// One sprite blit: top-left position, scaled size, rotation about the
/// sprite's own center, and opacity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteDraw {
    pub sprite: Sprite,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub rotation_deg: i32,
    pub alpha: u8,
}

impl SpriteDraw {
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// A frame being drawn.
pub trait Canvas {
    /// Wipe the whole frame to fully transparent.
    fn clear(&mut self);

    fn draw_sprite(&mut self, draw: &SpriteDraw);
}

/// Host window layer. The ticking thread is the only caller of
/// `acquire_target`/`present`.
pub trait SurfaceProvider: Send + 'static {
    type Target: Canvas;

    fn is_ready(&self) -> bool;

    fn acquire_target(&mut self) -> Result<Self::Target, SurfaceError>;

    fn present(&mut self, target: Self::Target) -> Result<(), SurfaceError>;
}

/// Draws onto any embedded-graphics target. Sprites are rendered as a
/// rotated diamond tinted by opacity; there is no alpha channel in Rgb565,
/// so "transparent" is the configured background colour.
pub struct DrawTargetCanvas<D> {
    target: D,
    background: Rgb565,
    tint: Rgb565,
}

impl<D> DrawTargetCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D, background: Rgb565, tint: Rgb565) -> Self {
        Self {
            target,
            background,
            tint,
        }
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    fn faded_tint(&self, alpha: u8) -> Rgb565 {
        let fade = |c: u8| (c as u16 * alpha as u16 / 255) as u8;
        Rgb565::new(fade(self.tint.r()), fade(self.tint.g()), fade(self.tint.b()))
    }
}

impl<D> Canvas for DrawTargetCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    fn clear(&mut self) {
        if let Err(e) = self.target.clear(self.background) {
            log::trace!("clear failed: {e:?}");
        }
    }

    fn draw_sprite(&mut self, draw: &SpriteDraw) {
        let center = draw.center();
        let rotation = Vec2::from_angle((draw.rotation_deg as f32).to_radians());
        let half_w = draw.width as f32 / 2.0;
        let half_h = draw.height as f32 / 2.0;

        // Diamond through the midpoints of the sprite box
        let corner = |offset: Vec2| {
            let p = center + rotation.rotate(offset);
            Point::new(p.x.round() as i32, p.y.round() as i32)
        };
        let top = corner(Vec2::new(0.0, -half_h));
        let right = corner(Vec2::new(half_w, 0.0));
        let bottom = corner(Vec2::new(0.0, half_h));
        let left = corner(Vec2::new(-half_w, 0.0));

        let style = PrimitiveStyle::with_fill(self.faded_tint(draw.alpha));
        for triangle in [Triangle::new(top, right, bottom), Triangle::new(bottom, left, top)] {
            if let Err(e) = triangle.into_styled(style).draw(&mut self.target) {
                log::trace!("sprite draw failed: {e:?}");
            }
        }
    }
}
