//! 2D vector math
//!
//! Thin free-function layer over `glam::DVec2` so the physics code reads the
//! same way regardless of which vector operations glam happens to provide.
//! Everything here is pure and deterministic.

use glam::DVec2;

#[inline]
pub fn add(a: DVec2, b: DVec2) -> DVec2 {
    a + b
}

#[inline]
pub fn subtract(a: DVec2, b: DVec2) -> DVec2 {
    a - b
}

#[inline]
pub fn scale(v: DVec2, factor: f64) -> DVec2 {
    v * factor
}

#[inline]
pub fn dot(a: DVec2, b: DVec2) -> f64 {
    a.dot(b)
}

#[inline]
pub fn magnitude(v: DVec2) -> f64 {
    v.length()
}

/// Unit vector in the direction of `v`, or the zero vector if `v` has no length
#[inline]
pub fn normalize(v: DVec2) -> DVec2 {
    let len = v.length();
    if len == 0.0 { DVec2::ZERO } else { v / len }
}

#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (b - a).length()
}

/// Reflect `incident` about `normal`: v' = v - 2(v·n̂)n̂
///
/// The normal is normalized first, so any non-zero normal works.
#[inline]
pub fn reflect(incident: DVec2, normal: DVec2) -> DVec2 {
    let n = normalize(normal);
    incident - 2.0 * incident.dot(n) * n
}

/// Bearing of `v` in radians (atan2)
#[inline]
pub fn angle(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Vector with the given bearing and length
#[inline]
pub fn from_angle(angle: f64, magnitude: f64) -> DVec2 {
    DVec2::new(angle.cos() * magnitude, angle.sin() * magnitude)
}
