//! 2D vector helpers layered on top of `glam::Vec2`.

use glam::Vec2;

/// Rescales `v` to exactly `max` if it is longer, otherwise returns it untouched.
///
/// The zero vector always comes back as the zero vector.
#[inline]
pub fn clamp_magnitude(v: Vec2, max: f32) -> Vec2 {
    let length_sq = v.length_squared();
    if length_sq > max * max {
        // Only calculate sqrt when needed
        v * (max / length_sq.sqrt())
    } else {
        v
    }
}

/// Classic Reynolds steer: head along `desired` at full speed, correcting the
/// current velocity by at most `max_force`.
///
/// Returns zero when `desired` has no direction.
#[inline]
pub fn seek(desired: Vec2, velocity: Vec2, max_speed: f32, max_force: f32) -> Vec2 {
    match desired.try_normalize() {
        Some(direction) => clamp_magnitude(direction * max_speed - velocity, max_force),
        None => Vec2::ZERO,
    }
}

/// Angle of `velocity` from the +x axis in radians, in `(-π, π]`.
#[inline]
pub fn heading(velocity: Vec2) -> f32 {
    velocity.y.atan2(velocity.x)
}
