use std::fmt;

use tracing::{debug, trace, warn};

use crate::forces::{resistance_coefficient, triangle_forces};
use crate::geometry::triangle_area;
use crate::mesh::hull_length;
use crate::sampling::{HeightQuery, HeightSampleCache, WaveFieldProvider};
use crate::submersion::{submerged_length, vertex_heights};
use crate::telemetry::{HullObserver, TriangleReport};
use crate::{BodyMotion, HullError, HullMesh, HydroConfig, RigidBodyHost, Submersion, Triangle, Vec2f, Vec3f};

/// Where the controller is within a step. Outside of [`HullWaterController::step`]
/// an initialized controller always reads `VertexRefresh`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepPhase {
    #[default]
    AwaitingInit,
    VertexRefresh,
    SamplingRequested,
    ForceApplication,
}

/// What one step did. Totals are forces (before any `dt` scaling); the
/// torque is taken about the body's centre of mass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HullStepSummary {
    pub step: u64,
    /// A sample set of the right size was used for classification.
    pub samples_available: bool,
    /// Steps between the query that produced the used samples and this one.
    pub sample_age: Option<u64>,
    pub submerged_area: f32,
    pub submerged_length: f32,
    pub full: usize,
    pub partial_two: usize,
    pub partial_single: usize,
    pub dry: usize,
    pub impulses_applied: usize,
    pub total_force: Vec3f,
    pub total_torque: Vec3f,
}

/// Drives buoyancy for one hull: refreshes world vertices, requests water
/// heights, classifies triangles against the latest samples and pushes the
/// resulting impulses into the rigid body.
pub struct HullWaterController {
    config: HydroConfig,
    phase: StepPhase,
    active: bool,
    local_vertices: Vec<Vec3f>,
    vertices: Vec<Vec3f>,
    triangles: Vec<Triangle>,
    // Scratch copy of the cached heights, so the lock is never held while
    // forces are computed.
    water_heights: Vec<f32>,
    samples: HeightSampleCache,
    total_area: f32,
    hull_length: f32,
    submerged_length: f32,
    step_index: u64,
    observer: Option<Box<dyn HullObserver + Send + Sync>>,
}

impl fmt::Debug for HullWaterController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HullWaterController")
            .field("phase", &self.phase)
            .field("active", &self.active)
            .field("vertices", &self.vertices.len())
            .field("triangles", &self.triangles.len())
            .field("total_area", &self.total_area)
            .field("hull_length", &self.hull_length)
            .field("submerged_length", &self.submerged_length)
            .field("step_index", &self.step_index)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl HullWaterController {
    pub fn new(config: HydroConfig) -> Result<Self, HullError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: StepPhase::AwaitingInit,
            active: true,
            local_vertices: Vec::new(),
            vertices: Vec::new(),
            triangles: Vec::new(),
            water_heights: Vec::new(),
            samples: HeightSampleCache::new(),
            total_area: 0.0,
            hull_length: 0.0,
            submerged_length: 0.0,
            step_index: 0,
            observer: None,
        })
    }

    pub fn from_mesh(config: HydroConfig, mesh: &HullMesh) -> Result<Self, HullError> {
        let mut controller = Self::new(config)?;
        controller.initialize(mesh)?;
        Ok(controller)
    }

    /// Build the triangle list and the hull aggregates. Runs once; the
    /// topology is fixed for the controller's lifetime afterwards.
    pub fn initialize(&mut self, mesh: &HullMesh) -> Result<(), HullError> {
        if self.phase != StepPhase::AwaitingInit {
            return Err(HullError::AlreadyInitialized);
        }
        let triangles = mesh.build_triangles(self.config.units_per_meter)?;

        let diag = mesh.diagnostics();
        if !diag.is_closed_outward() {
            if self.config.strict_mesh_validation {
                return Err(HullError::InconsistentWinding {
                    open_edges: diag.open_edges,
                    misoriented_edges: diag.misoriented_edges,
                    signed_volume: diag.signed_volume,
                });
            }
            warn!(
                open_edges = diag.open_edges,
                misoriented_edges = diag.misoriented_edges,
                signed_volume = diag.signed_volume,
                "hull mesh is not a closed outward-wound surface; buoyancy will be unreliable"
            );
        }

        let total_area: f32 = triangles.iter().map(|t| t.area).sum();
        if !(total_area > 0.0) {
            return Err(HullError::DegenerateMesh("total surface area is zero"));
        }
        let length = hull_length(&mesh.vertices);
        if !(length > 0.0) {
            return Err(HullError::DegenerateMesh("hull length is zero"));
        }

        self.local_vertices = mesh.vertices.clone();
        self.vertices = mesh.vertices.clone();
        self.water_heights = Vec::with_capacity(mesh.vertices.len());
        self.triangles = triangles;
        self.total_area = total_area;
        self.hull_length = length;
        self.submerged_length = 0.0;
        self.phase = StepPhase::VertexRefresh;
        debug!(
            vertices = self.vertices.len(),
            triangles = self.triangles.len(),
            total_area,
            hull_length = length,
            "hull initialized"
        );
        Ok(())
    }

    /// Swap tuning constants. Rest areas are recomputed when the unit scale
    /// changes.
    pub fn set_config(&mut self, config: HydroConfig) -> Result<(), HullError> {
        config.validate()?;
        let rescale = config.units_per_meter != self.config.units_per_meter;
        self.config = config;
        if rescale && self.phase != StepPhase::AwaitingInit {
            let to_square_meters = 1.0 / (self.config.units_per_meter * self.config.units_per_meter);
            for tri in &mut self.triangles {
                let [a, b, c] = tri.vertices(&self.local_vertices);
                tri.area = triangle_area(a, b, c) * to_square_meters;
            }
            self.total_area = self.triangles.iter().map(|t| t.area).sum();
        }
        Ok(())
    }

    pub fn set_observer(&mut self, observer: impl HullObserver + Send + Sync + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Stop issuing queries and drop the cached samples. Replies still in
    /// flight complete into a cache nobody reads.
    pub fn shutdown(&mut self) {
        self.active = false;
        self.samples.clear();
        debug!(steps = self.step_index, "hull controller shut down");
    }

    pub fn config(&self) -> &HydroConfig {
        &self.config
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// World-space vertices as of the last step.
    pub fn vertices(&self) -> &[Vec3f] {
        &self.vertices
    }

    pub fn total_area(&self) -> f32 {
        self.total_area
    }

    pub fn hull_length(&self) -> f32 {
        self.hull_length
    }

    pub fn submerged_length(&self) -> f32 {
        self.submerged_length
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn samples(&self) -> &HeightSampleCache {
        &self.samples
    }

    /// Advance one simulation step. A no-op before initialization and after
    /// shutdown.
    pub fn step<B, W>(&mut self, body: &mut B, waves: &mut W, dt: f32) -> HullStepSummary
    where
        B: RigidBodyHost + ?Sized,
        W: WaveFieldProvider + ?Sized,
    {
        let mut summary = HullStepSummary {
            step: self.step_index,
            submerged_length: self.submerged_length,
            ..HullStepSummary::default()
        };
        if self.phase == StepPhase::AwaitingInit || !self.active {
            return summary;
        }

        self.phase = StepPhase::VertexRefresh;
        let pose = body.pose();
        for (world, local) in self.vertices.iter_mut().zip(&self.local_vertices) {
            *world = pose.transform_point(*local);
        }

        self.phase = StepPhase::SamplingRequested;
        let units = self.config.units_per_meter;
        let positions = self.vertices.iter().map(|v| Vec2f::new(v.x, v.y) / units).collect();
        let reply = self
            .samples
            .reply(self.step_index, units, self.config.discard_out_of_order_samples);
        waves.sample_displacements(HeightQuery { positions, reply });

        self.phase = StepPhase::ForceApplication;
        match self.samples.copy_latest(&mut self.water_heights) {
            Some(issued) if self.water_heights.len() == self.vertices.len() => {
                summary.samples_available = true;
                summary.sample_age = Some(self.step_index.saturating_sub(issued));
                // Submerged length is refreshed before forces so the Reynolds
                // number sees this step's waterline.
                self.classify(&mut summary);
                self.apply_forces(body, dt, &mut summary);
            }
            Some(issued) => warn!(
                expected = self.vertices.len(),
                received = self.water_heights.len(),
                issued,
                "height sample count does not match hull vertices; skipping classification"
            ),
            None => trace!(step = self.step_index, "no height samples yet"),
        }

        summary.submerged_length = self.submerged_length;
        trace!(?summary, "hull step");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_step(&summary);
        }
        self.step_index += 1;
        self.phase = StepPhase::VertexRefresh;
        summary
    }

    fn classify(&mut self, summary: &mut HullStepSummary) {
        let mut submerged_area = 0.0;
        for tri in &mut self.triangles {
            let heights = vertex_heights(tri.vertices(&self.vertices), tri.water_heights(&self.water_heights));
            tri.submerged = Submersion::classify(heights);
            match tri.submerged {
                Submersion::Full => {
                    submerged_area += tri.area;
                    summary.full += 1;
                }
                Submersion::PartialTwoVertices => summary.partial_two += 1,
                Submersion::PartialSingleVertex => summary.partial_single += 1,
                Submersion::None => summary.dry += 1,
            }
        }
        self.submerged_length = submerged_length(self.hull_length, submerged_area, self.total_area);
        summary.submerged_area = submerged_area;
    }

    fn apply_forces<B: RigidBodyHost + ?Sized>(&mut self, body: &mut B, dt: f32, summary: &mut HullStepSummary) {
        let cfg = &self.config;
        let motion = BodyMotion::capture(body);
        let to_meters = 1.0 / cfg.units_per_meter;
        let coefficient = resistance_coefficient(
            cfg,
            motion.linear_velocity.length() * to_meters,
            self.submerged_length * to_meters,
        );
        let impulse_scale = if cfg.scale_impulse_by_dt { dt } else { 1.0 };

        for (index, tri) in self.triangles.iter().enumerate() {
            let vertices = tri.vertices(&self.vertices);
            let water_heights = tri.water_heights(&self.water_heights);
            let forces = if tri.submerged.is_full() {
                let heights = vertex_heights(vertices, water_heights);
                triangle_forces(cfg, vertices, heights, tri.area, &motion, coefficient)
            } else {
                None
            };

            if let Some(f) = &forces {
                let force = f.total();
                summary.total_force += force;
                summary.total_torque += (f.centroid - motion.center_of_mass).cross(force);
                let impulse = force * impulse_scale;
                if impulse != Vec3f::ZERO {
                    body.apply_impulse_at_point(impulse, f.centroid);
                    summary.impulses_applied += 1;
                }
            }

            if let Some(observer) = self.observer.as_mut() {
                observer.on_triangle(&TriangleReport {
                    index,
                    vertices,
                    water_heights,
                    submersion: tri.submerged,
                    forces,
                });
            }
        }
    }
}
