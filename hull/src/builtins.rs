use crate::{HullMesh, Vec2f, Vec3f};

/// Extrude a convex cross-section along +X into a closed, outward-wound hull
/// centred on the origin. `profile` holds (y, z) points in counter-clockwise
/// order, as seen with +Y to the right and +Z up.
pub fn prism_hull(profile: &[Vec2f], length: f32) -> HullMesh {
    let n = profile.len() as u32;
    let half = length * 0.5;

    let mut vertices = Vec::with_capacity(profile.len() * 2);
    vertices.extend(profile.iter().map(|p| Vec3f::new(-half, p.x, p.y)));
    vertices.extend(profile.iter().map(|p| Vec3f::new(half, p.x, p.y)));

    let mut triangles = Vec::new();
    if n < 3 {
        return HullMesh::new(vertices, triangles);
    }
    // Bow cap keeps the profile order (+X normal), stern cap reverses it.
    for i in 1..n - 1 {
        triangles.push([n, n + i, n + i + 1]);
        triangles.push([0, i + 1, i]);
    }
    for i in 0..n {
        let j = (i + 1) % n;
        triangles.push([i, j, n + j]);
        triangles.push([i, n + j, n + i]);
    }
    HullMesh::new(vertices, triangles)
}

/// Axis-aligned box, length along X.
pub fn box_hull(half_extents: Vec3f) -> HullMesh {
    let (hy, hz) = (half_extents.y, half_extents.z);
    prism_hull(
        &[
            Vec2f::new(-hy, -hz),
            Vec2f::new(hy, -hz),
            Vec2f::new(hy, hz),
            Vec2f::new(-hy, hz),
        ],
        half_extents.x * 2.0,
    )
}

/// Flat-bottomed 3 m skiff with flared sides.
pub fn skiff_hull() -> HullMesh {
    prism_hull(
        &[
            Vec2f::new(-0.4, -0.3),
            Vec2f::new(0.4, -0.3),
            Vec2f::new(0.7, 0.3),
            Vec2f::new(-0.7, 0.3),
        ],
        3.0,
    )
}
