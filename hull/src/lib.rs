//! Buoyancy and hydrodynamic forces for a triangulated hull floating on a
//! sampled water surface.
//!
//! The crate has no ECS types. The rigid body, the wave
//! field and the scheduler are collaborators reached through the
//! [`RigidBodyHost`] and [`WaveFieldProvider`] traits; the host decides how
//! often [`HullWaterController::step`] runs.

mod math;
pub use math::{HullPose, Quatf, Vec2f, Vec3f, UP};

mod error;
pub use error::HullError;

pub mod geometry;
pub mod forces;
pub mod submersion;
pub use submersion::Submersion;

mod mesh;
pub use mesh::{HullMesh, MeshDiagnostics, Triangle};

pub mod builtins;

mod config;
pub use config::{hydro_presets, HydroConfig};

pub mod sampling;
pub use sampling::{HeightQuery, HeightSampleCache, SampleReply, StillWater, WaveFieldProvider};

mod host;
pub use host::{BodyMotion, RigidBodyHost};

pub mod telemetry;
pub use telemetry::{HullObserver, RecordingObserver, TriangleReport};

mod controller;
pub use controller::{HullStepSummary, HullWaterController, StepPhase};

mod follower;
pub use follower::SurfaceFollower;
