use crate::{HullPose, Vec3f};

/// The rigid body a hull is attached to. The hull only reads motion state
/// and pushes impulses; it never writes velocity or pose directly.
pub trait RigidBodyHost {
    /// World transform applied to the hull's local-space mesh vertices.
    fn pose(&self) -> HullPose;
    fn linear_velocity(&self) -> Vec3f;
    fn angular_velocity(&self) -> Vec3f;
    /// World-space centre of mass.
    fn center_of_mass(&self) -> Vec3f;
    fn mass(&self) -> f32;
    /// Apply `impulse` at world point `point`. A zero impulse must be a no-op.
    fn apply_impulse_at_point(&mut self, impulse: Vec3f, point: Vec3f);
}

/// Motion state captured once per step, before any impulse of that step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyMotion {
    pub linear_velocity: Vec3f,
    pub angular_velocity: Vec3f,
    pub center_of_mass: Vec3f,
    pub mass: f32,
}

impl BodyMotion {
    pub fn capture<B: RigidBodyHost + ?Sized>(body: &B) -> Self {
        Self {
            linear_velocity: body.linear_velocity(),
            angular_velocity: body.angular_velocity(),
            center_of_mass: body.center_of_mass(),
            mass: body.mass(),
        }
    }

    pub fn at_rest(mass: f32) -> Self {
        Self { mass, ..Self::default() }
    }
}
