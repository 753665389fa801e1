//! Pivot-rotation geometry shared by every animated body.
//!
//! Screen space is y-down with the origin at the top-left, matching window
//! coordinates. A positive angle rotates counter-clockwise *visually*, which
//! in a y-down basis is the standard mathematical rotation with the angle
//! negated. The helpers below encode that sign convention once so body code
//! never touches raw trig.

use glam::Vec2;

/// Rotate `v` by `angle_deg` in screen space (positive = visual CCW).
pub fn rotate_screen(v: Vec2, angle_deg: f32) -> Vec2 {
    let (sin, cos) = (-angle_deg).to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// New on-screen center for a sprite whose unrotated center was `origin`,
/// after the sprite content is rotated by `angle_deg` about `pivot`.
///
/// The pivot-to-origin arm revolves in the same visual sense as the sprite
/// content, so the point that sat at distance `|origin - pivot|` from the
/// pivot stays at exactly that distance, swung around by `angle_deg`.
/// Any real angle is valid; the trig wraps implicitly.
pub fn rotate_about_pivot(angle_deg: f32, pivot: Vec2, origin: Vec2) -> Vec2 {
    pivot + rotate_screen(origin - pivot, angle_deg)
}

/// Polar placement: an offset of magnitude `radius` at bearing `angle_deg`,
/// in the same sign convention as [`rotate_screen`].
pub fn bearing_offset(radius: f32, angle_deg: f32) -> Vec2 {
    rotate_screen(Vec2::new(radius, 0.0), angle_deg)
}
