use serde::{Deserialize, Serialize};

pub use bevy_math::{Quat as Quatf, Vec2 as Vec2f, Vec3 as Vec3f};

/// World up. Water elevations and submersion depths are measured along +Z;
/// the horizontal plane queried from the wave field is (x, y).
pub const UP: Vec3f = Vec3f::Z;

/// World transform of a hull: scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullPose {
    pub translation: Vec3f,
    pub rotation: Quatf,
    pub scale: Vec3f,
}

impl HullPose {
    pub const IDENTITY: Self = Self {
        translation: Vec3f::ZERO,
        rotation: Quatf::IDENTITY,
        scale: Vec3f::ONE,
    };

    pub fn from_translation(translation: Vec3f) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn from_translation_rotation(translation: Vec3f, rotation: Quatf) -> Self {
        Self { translation, rotation, ..Self::IDENTITY }
    }

    #[inline]
    pub fn transform_point(&self, local: Vec3f) -> Vec3f {
        self.translation + self.rotation * (self.scale * local)
    }
}

impl Default for HullPose {
    fn default() -> Self { Self::IDENTITY }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_scales_then_rotates_then_translates() {
        let pose = HullPose {
            translation: Vec3f::new(0.0, 0.0, 5.0),
            rotation: Quatf::from_rotation_z(std::f32::consts::FRAC_PI_2),
            scale: Vec3f::splat(2.0),
        };
        let p = pose.transform_point(Vec3f::X);
        assert!((p - Vec3f::new(0.0, 2.0, 5.0)).length() < 1e-5, "got {p:?}");
    }
}
