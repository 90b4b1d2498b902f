use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::triangle_area;
use crate::{HullError, Submersion, Vec3f};

/// Local-space hull topology, handed over once when the mesh becomes available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HullMesh {
    pub vertices: Vec<Vec3f>,
    pub triangles: Vec<[u32; 3]>,
}

/// A hull triangle: fixed vertex indices, rest area in m² and the
/// submersion category from the most recent classified step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub submerged: Submersion,
    pub area: f32,
}

/// Closedness and orientation of a mesh surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshDiagnostics {
    /// Undirected edges used by exactly one triangle.
    pub open_edges: usize,
    /// Shared edges traversed in the same direction by both neighbours.
    pub misoriented_edges: usize,
    /// Positive for a closed outward-wound surface.
    pub signed_volume: f32,
}

impl MeshDiagnostics {
    pub fn is_closed_outward(&self) -> bool {
        self.open_edges == 0 && self.misoriented_edges == 0 && self.signed_volume > 0.0
    }
}

impl HullMesh {
    pub fn new(vertices: Vec<Vec3f>, triangles: Vec<[u32; 3]>) -> Self {
        Self { vertices, triangles }
    }

    /// Rejects empty meshes and out-of-range indices.
    pub fn validate(&self) -> Result<(), HullError> {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return Err(HullError::EmptyMesh {
                vertices: self.vertices.len(),
                triangles: self.triangles.len(),
            });
        }
        let vertices = self.vertices.len();
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices) {
                return Err(HullError::IndexOutOfRange { triangle, index, vertices });
            }
        }
        Ok(())
    }

    /// Build the triangle list with rest areas converted to m².
    pub fn build_triangles(&self, units_per_meter: f32) -> Result<Vec<Triangle>, HullError> {
        self.validate()?;
        let to_square_meters = 1.0 / (units_per_meter * units_per_meter);
        Ok(self
            .triangles
            .iter()
            .map(|tri| {
                let indices = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                let [a, b, c] = indices.map(|i| self.vertices[i]);
                Triangle {
                    indices,
                    submerged: Submersion::None,
                    area: triangle_area(a, b, c) * to_square_meters,
                }
            })
            .collect())
    }

    pub fn diagnostics(&self) -> MeshDiagnostics {
        // (forward, backward) traversal counts keyed by (low, high) vertex index.
        let mut edges: HashMap<(u32, u32), (usize, usize)> = HashMap::new();
        let mut signed_volume = 0.0_f32;
        for tri in &self.triangles {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let entry = edges.entry((a.min(b), a.max(b))).or_default();
                if a < b { entry.0 += 1 } else { entry.1 += 1 }
            }
            let [a, b, c] = tri.map(|i| self.vertices.get(i as usize).copied().unwrap_or_default());
            signed_volume += a.dot(b.cross(c)) / 6.0;
        }

        let mut diag = MeshDiagnostics { signed_volume, ..MeshDiagnostics::default() };
        for &(forward, backward) in edges.values() {
            if forward + backward == 1 {
                diag.open_edges += 1;
            } else if forward != backward {
                diag.misoriented_edges += 1;
            }
        }
        diag
    }
}

impl Triangle {
    #[inline]
    pub fn vertices(&self, positions: &[Vec3f]) -> [Vec3f; 3] {
        self.indices.map(|i| positions[i])
    }

    #[inline]
    pub fn water_heights(&self, heights: &[f32]) -> [f32; 3] {
        self.indices.map(|i| heights[i])
    }
}

/// Distance between the two vertices that are extremal along the mesh's
/// longest bounding-box axis.
pub fn hull_length(vertices: &[Vec3f]) -> f32 {
    let (min, max) = vertices.iter().fold(
        (Vec3f::splat(f32::INFINITY), Vec3f::splat(f32::NEG_INFINITY)),
        |(lo, hi), v| (lo.min(*v), hi.max(*v)),
    );
    let extent = max - min;
    let axis = if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    };
    let lowest = vertices.iter().min_by(|a, b| a[axis].total_cmp(&b[axis]));
    let highest = vertices.iter().max_by(|a, b| a[axis].total_cmp(&b[axis]));
    match (lowest, highest) {
        (Some(a), Some(b)) => a.distance(*b),
        _ => 0.0,
    }
}
