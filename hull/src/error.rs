use thiserror::Error;

/// Conditions that stop a hull from being built or configured.
///
/// Missing water samples, zero velocity and degenerate triangles are not
/// errors: they are absorbed per step and show up in the step summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HullError {
    #[error("hull mesh is empty ({vertices} vertices, {triangles} triangles)")]
    EmptyMesh { vertices: usize, triangles: usize },
    #[error("triangle {triangle} references vertex {index} but the mesh has {vertices} vertices")]
    IndexOutOfRange { triangle: usize, index: u32, vertices: usize },
    #[error("hull mesh is degenerate: {0}")]
    DegenerateMesh(&'static str),
    #[error(
        "hull mesh is not a closed outward-wound surface \
         ({open_edges} open edges, {misoriented_edges} misoriented edges, signed volume {signed_volume})"
    )]
    InconsistentWinding {
        open_edges: usize,
        misoriented_edges: usize,
        signed_volume: f32,
    },
    #[error("invalid hydro config: {0}")]
    InvalidConfig(String),
    #[error("hull controller is already initialized")]
    AlreadyInitialized,
}
