//! Triangle and rigid-body point helpers. Pure functions, no state.

use crate::Vec3f;

/// Sine of the smallest edge angle for which a triangle still has a usable
/// normal. Relative to edge lengths, so it holds at any mesh scale.
const DEGENERATE_SIN: f32 = 1e-6;

/// Distance from `point` to the infinite line through `origin` along `direction`.
#[inline]
pub fn point_distance_to_line(point: Vec3f, direction: Vec3f, origin: Vec3f) -> f32 {
    let len2 = direction.length_squared();
    if len2 <= f32::MIN_POSITIVE {
        return point.distance(origin);
    }
    (point - origin).cross(direction).length() / len2.sqrt()
}

/// Half base times height, with `v2 → v3` as the base. Collinear input gives 0.
pub fn triangle_area(v1: Vec3f, v2: Vec3f, v3: Vec3f) -> f32 {
    0.5 * v2.distance(v3) * point_distance_to_line(v1, v2 - v3, v2)
}

/// Unit normal from `(v1 - v2) × (v2 - v3)`; counter-clockwise winding seen
/// from outside gives the outward normal. Degenerate triangles yield
/// `Vec3f::ZERO`, so check before using the result as a direction.
pub fn triangle_normal(v1: Vec3f, v2: Vec3f, v3: Vec3f) -> Vec3f {
    let (a, b) = (v1 - v2, v2 - v3);
    let cross = a.cross(b);
    let scale_sq = a.length_squared() * b.length_squared();
    if cross.length_squared() <= DEGENERATE_SIN * DEGENERATE_SIN * scale_sq {
        return Vec3f::ZERO;
    }
    cross.normalize_or_zero()
}

#[inline]
pub fn centroid_of_triangle(v1: Vec3f, v2: Vec3f, v3: Vec3f) -> Vec3f {
    (v1 + v2 + v3) / 3.0
}

/// Velocity of a point rigidly attached to a body: `v + ω × (p - com)`.
#[inline]
pub fn point_velocity(
    linear_velocity: Vec3f,
    angular_velocity: Vec3f,
    center_of_mass: Vec3f,
    point: Vec3f,
) -> Vec3f {
    linear_velocity + angular_velocity.cross(point - center_of_mass)
}
