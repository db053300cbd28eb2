//! Quadratic Bezier evaluation

use glam::Vec2;

/// `P(t) = (1-t)^2 * p0 + 2t(1-t) * p1 + t^2 * p2`.
///
/// `t` is not clamped; values past 1 extrapolate along the curve.
pub fn quadratic_point(t: f32, p0: Vec2, p1: Vec2, p2: Vec2) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * t * u) + p2 * (t * t)
}
