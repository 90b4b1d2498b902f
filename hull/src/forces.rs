//! Per-triangle force model: hydrostatic pressure, viscous skin friction and
//! pressure/suction drag. All functions are pure; the controller decides
//! which triangles reach them and turns the result into impulses.

use crate::geometry::{centroid_of_triangle, point_velocity, triangle_normal};
use crate::{BodyMotion, HydroConfig, Vec3f, UP};

/// Forces computed for one fully submerged, downward-facing triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriangleForces {
    /// Application point (world).
    pub centroid: Vec3f,
    pub normal: Vec3f,
    pub hydrostatic: Vec3f,
    pub viscous: Vec3f,
    pub drag: Vec3f,
}

impl TriangleForces {
    #[inline]
    pub fn total(&self) -> Vec3f {
        self.hydrostatic + self.viscous + self.drag
    }
}

/// `-ρ · weight · depth · area · n`, with depth the mean of the three signed
/// vertex heights. With a signed (negative) weight and a downward normal the
/// result points up and grows linearly with depth.
pub fn hydrostatic_force(
    cfg: &HydroConfig,
    weight: f32,
    heights: [f32; 3],
    area: f32,
    normal: Vec3f,
) -> Vec3f {
    let centroid_depth = (heights[0] + heights[1] + heights[2]) / 3.0;
    -cfg.density_of_water * weight * centroid_depth * area * normal
}

/// ITTC-57 friction line: `0.075 / (log10(Re) - 2)²`.
///
/// `Re` is floored at `cfg.min_reynolds`, so a hull at rest or with nothing
/// submerged still gets a finite coefficient.
pub fn resistance_coefficient(cfg: &HydroConfig, speed: f32, length: f32) -> f32 {
    let reynolds = (speed * length / cfg.kinematic_viscosity).max(cfg.min_reynolds);
    if !reynolds.is_finite() {
        return 0.0;
    }
    let denom = reynolds.log10() - 2.0;
    let denom_sq = denom * denom;
    if denom_sq <= f32::EPSILON {
        return 0.0;
    }
    0.075 / denom_sq
}

/// Skin friction opposing the flow along the face.
///
/// The velocity is projected into the triangle's plane with `n × (v × n)`;
/// the flow runs opposite to that tangential component at the body's speed.
pub fn viscous_resistance_force(
    cfg: &HydroConfig,
    velocity: Vec3f,
    normal: Vec3f,
    area: f32,
    coefficient: f32,
) -> Vec3f {
    let speed = velocity.length();
    if speed <= cfg.min_speed {
        return Vec3f::ZERO;
    }
    let tangential = normal.cross(velocity.cross(normal) / speed) / speed;
    let flow_direction = -tangential.normalize_or_zero();
    let flow = speed * flow_direction;
    0.5 * cfg.density_of_water * flow.length() * flow * area * coefficient
}

/// Pressure drag when the face moves into the water (`cos > 0`), suction when
/// it moves away. `cos` is between the unit point velocity and the normal.
pub fn pressure_drag_force(cfg: &HydroConfig, cos_velocity_normal: f32, normal: Vec3f, area: f32) -> Vec3f {
    if cos_velocity_normal > 0.0 {
        let coeff = cfg.linear_pressure_drag + cfg.quadratic_pressure_drag;
        -coeff * area * cos_velocity_normal.powf(cfg.pressure_falloff_power) * normal
    } else {
        let coeff = cfg.linear_suction_drag + cfg.quadratic_suction_drag;
        coeff * area * cos_velocity_normal.abs().powf(cfg.suction_falloff_power) * normal
    }
}

/// Full force breakdown for a `Full` triangle.
///
/// Returns `None` when the face points up or edge-on (including degenerate
/// triangles with no normal), or when the inputs produce a non-finite force.
/// `heights` are the signed vertex heights above water.
pub fn triangle_forces(
    cfg: &HydroConfig,
    vertices: [Vec3f; 3],
    heights: [f32; 3],
    area: f32,
    motion: &BodyMotion,
    coefficient: f32,
) -> Option<TriangleForces> {
    let [v1, v2, v3] = vertices;
    let normal = triangle_normal(v1, v2, v3);
    if normal.dot(UP) >= 0.0 {
        return None;
    }

    let centroid = centroid_of_triangle(v1, v2, v3);
    let velocity = point_velocity(
        motion.linear_velocity,
        motion.angular_velocity,
        motion.center_of_mass,
        centroid,
    );
    let weight = cfg.gravity * motion.mass;

    let hydrostatic = hydrostatic_force(cfg, weight, heights, area, normal);
    let viscous = viscous_resistance_force(cfg, velocity, normal, area, coefficient);
    let speed = velocity.length();
    let drag = if speed > cfg.min_speed {
        let cos = (velocity / speed).dot(normal);
        pressure_drag_force(cfg, cos, normal, area)
    } else {
        Vec3f::ZERO
    };

    let forces = TriangleForces { centroid, normal, hydrostatic, viscous, drag };
    if !forces.total().is_finite() {
        tracing::trace!(?forces, "dropping non-finite triangle force");
        return None;
    }
    Some(forces)
}
