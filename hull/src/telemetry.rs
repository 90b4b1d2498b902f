//! Optional per-triangle and per-step observation hook.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::forces::TriangleForces;
use crate::{HullStepSummary, Submersion, Vec3f};

/// What the controller saw for one triangle during a classified step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleReport {
    pub index: usize,
    pub vertices: [Vec3f; 3],
    pub water_heights: [f32; 3],
    pub submersion: Submersion,
    /// Present only when the triangle actually produced a force.
    pub forces: Option<TriangleForces>,
}

/// Receives reports while a registered controller steps. Called on the
/// stepping thread, after the sample lock has been released.
pub trait HullObserver {
    fn on_triangle(&mut self, report: &TriangleReport);

    fn on_step(&mut self, _summary: &HullStepSummary) {}
}

#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub reports: Vec<TriangleReport>,
    pub steps: Vec<HullStepSummary>,
}

/// Observer that keeps everything it is shown. Clones share the same
/// recording, so keep one clone and hand the other to the controller.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Recording {
        self.inner.lock().clone()
    }

    pub fn clear(&self) {
        let mut rec = self.inner.lock();
        rec.reports.clear();
        rec.steps.clear();
    }
}

impl HullObserver for RecordingObserver {
    fn on_triangle(&mut self, report: &TriangleReport) {
        self.inner.lock().reports.push(*report);
    }

    fn on_step(&mut self, summary: &HullStepSummary) {
        self.inner.lock().steps.push(*summary);
    }
}
