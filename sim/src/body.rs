use bevy_ecs::prelude::Component;
use hull::{HullPose, Quatf, RigidBodyHost, Vec3f};

/// Minimal rigid body: semi-implicit Euler, diagonal box inertia, impulses
/// only. `position` is the centre of mass and the origin of the hull mesh.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub position: Vec3f,
    pub orientation: Quatf,
    pub linear_velocity: Vec3f,
    pub angular_velocity: Vec3f,
    pub mass: f32,
    /// Principal moments in the body frame.
    pub inertia: Vec3f,
    pub angular_damping: f32,
}

impl RigidBody {
    pub fn new(mass: f32, half_extents: Vec3f, position: Vec3f, orientation: Quatf) -> Self {
        Self {
            position,
            orientation,
            linear_velocity: Vec3f::ZERO,
            angular_velocity: Vec3f::ZERO,
            mass,
            inertia: box_inertia(mass, half_extents),
            angular_damping: 0.0,
        }
    }

    fn apply_inverse_inertia(&self, world: Vec3f) -> Vec3f {
        let local = self.orientation.inverse() * world;
        let inv = Vec3f::new(
            recip_or_zero(self.inertia.x),
            recip_or_zero(self.inertia.y),
            recip_or_zero(self.inertia.z),
        );
        self.orientation * (local * inv)
    }

    /// Advance by `dt` under constant `gravity` (an acceleration).
    pub fn integrate(&mut self, gravity: Vec3f, dt: f32) {
        self.linear_velocity += gravity * dt;
        self.position += self.linear_velocity * dt;

        self.angular_velocity *= (1.0 - self.angular_damping * dt).max(0.0);
        let rotation = self.angular_velocity * dt;
        if rotation.length_squared() > 0.0 {
            self.orientation = (Quatf::from_scaled_axis(rotation) * self.orientation).normalize();
        }
    }

    /// Body +Z in world space.
    pub fn up(&self) -> Vec3f {
        self.orientation * Vec3f::Z
    }
}

impl RigidBodyHost for RigidBody {
    fn pose(&self) -> HullPose {
        HullPose::from_translation_rotation(self.position, self.orientation)
    }

    fn linear_velocity(&self) -> Vec3f {
        self.linear_velocity
    }

    fn angular_velocity(&self) -> Vec3f {
        self.angular_velocity
    }

    fn center_of_mass(&self) -> Vec3f {
        self.position
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn apply_impulse_at_point(&mut self, impulse: Vec3f, point: Vec3f) {
        if impulse == Vec3f::ZERO || self.mass <= 0.0 {
            return;
        }
        self.linear_velocity += impulse / self.mass;
        let angular_impulse = (point - self.position).cross(impulse);
        self.angular_velocity += self.apply_inverse_inertia(angular_impulse);
    }
}

/// Solid box: `m/3 · (b² + c²)` per axis, with half extents `a, b, c`.
pub fn box_inertia(mass: f32, half_extents: Vec3f) -> Vec3f {
    let h2 = half_extents * half_extents;
    Vec3f::new(h2.y + h2.z, h2.x + h2.z, h2.x + h2.y) * (mass / 3.0)
}

#[inline]
fn recip_or_zero(v: f32) -> f32 {
    if v > 0.0 {
        1.0 / v
    } else {
        0.0
    }
}
