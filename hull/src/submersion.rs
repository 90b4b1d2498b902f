//! Per-triangle submersion classification.

use serde::{Deserialize, Serialize};

use crate::Vec3f;

/// How many of a triangle's vertices sit strictly below the local water
/// surface. Only `Full` triangles receive forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Submersion {
    #[default]
    None,
    PartialSingleVertex,
    PartialTwoVertices,
    Full,
}

impl Submersion {
    /// Classify from signed heights above the water (negative = submerged).
    /// A height of exactly zero counts as dry; NaN never counts as submerged.
    pub fn classify(heights: [f32; 3]) -> Self {
        match heights.iter().filter(|h| **h < 0.0).count() {
            3 => Submersion::Full,
            2 => Submersion::PartialTwoVertices,
            1 => Submersion::PartialSingleVertex,
            _ => Submersion::None,
        }
    }

    #[inline]
    pub fn is_full(self) -> bool {
        self == Submersion::Full
    }
}

/// Signed height of each vertex above the water elevation sampled under it.
#[inline]
pub fn vertex_heights(vertices: [Vec3f; 3], water: [f32; 3]) -> [f32; 3] {
    [
        vertices[0].z - water[0],
        vertices[1].z - water[1],
        vertices[2].z - water[2],
    ]
}

/// `hull_length × submerged_area / total_area`, clamped to `[0, hull_length]`.
pub fn submerged_length(hull_length: f32, submerged_area: f32, total_area: f32) -> f32 {
    if !(total_area > 0.0) || !(hull_length > 0.0) {
        return 0.0;
    }
    let ratio = submerged_area / total_area;
    if !ratio.is_finite() {
        return 0.0;
    }
    (hull_length * ratio).clamp(0.0, hull_length)
}
