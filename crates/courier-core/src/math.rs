//! Angle and vector helpers
//!
//! Rotations throughout Courier are scalar angles in degrees, counter-clockwise
//! positive, with 0 meaning "upright / facing +X".

use glam::Vec2;

/// Wrap `t` into `[0, length)`.
fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Interpolate between two angles along the shortest arc.
///
/// `t` is clamped to `[0, 1]`, so callers can pass `speed * dt` directly.
pub fn lerp_angle(current: f32, target: f32, t: f32) -> f32 {
    current + delta_angle(current, target) * t.clamp(0.0, 1.0)
}

/// Rotate `current` toward `target` by at most `max_delta` degrees.
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_delta {
        current + delta
    } else {
        current + delta.signum() * max_delta
    }
}

/// Map any angle into `(-180, 180]`.
pub fn wrap_angle_180(angle: f32) -> f32 {
    delta_angle(0.0, angle)
}

/// Unit vector for an angle in degrees.
pub fn direction_from_degrees(angle: f32) -> Vec2 {
    Vec2::from_angle(angle.to_radians())
}

/// Rotation (degrees) that stands a sprite upright on a surface with `normal`.
pub fn surface_alignment_angle(normal: Vec2) -> f32 {
    normal.y.atan2(normal.x).to_degrees() - 90.0
}
