//! Angle utilities for site normals.
//!
//! Site orientations are stored as the angle of the contour normal in image
//! coordinates (x right, y down), so the search direction is `(cos α, sin α)`.

use std::f32::consts::PI;

/// Normalizes an angle into the range [0, π).
#[inline]
pub fn normalize_half_pi(angle: f32) -> f32 {
    let norm = angle.rem_euclid(PI);
    if norm >= PI - 1e-6 {
        0.0
    } else {
        norm
    }
}

/// Wraps an angle into (-π, π].
#[inline]
pub fn wrap_pi(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Unit search direction for a normal angle.
#[inline]
pub fn normal_from_angle(angle: f32) -> [f32; 2] {
    [angle.cos(), angle.sin()]
}

/// Angle of a 2D vector; zero for the null vector.
#[inline]
pub fn angle_of(v: &[f32; 2]) -> f32 {
    if v[0] == 0.0 && v[1] == 0.0 {
        0.0
    } else {
        v[1].atan2(v[0])
    }
}

/// Computes the unsigned angle between two 2D vectors in radians.
/// Returns a value in [0, π].
#[inline]
pub fn angle_between(a: &[f32; 2], b: &[f32; 2]) -> f32 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let na = (a[0] * a[0] + a[1] * a[1]).sqrt().max(1e-6);
    let nb = (b[0] * b[0] + b[1] * b[1]).sqrt().max(1e-6);
    (dot / (na * nb)).clamp(-1.0, 1.0).acos()
}
