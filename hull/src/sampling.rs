//! Water-height sampling channel between a hull and an external wave field.
//!
//! Every step the controller sends one [`HeightQuery`] holding the horizontal
//! position of each vertex. The provider answers through the query's
//! [`SampleReply`], immediately or on any later step and from any thread.
//! The answer lands in a single-slot [`HeightSampleCache`] that the
//! controller copies out of at the start of classification.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Vec2f, Vec3f};

/// One complete answer to a height query, already converted to world units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightSampleSet {
    /// Absolute water elevation under each vertex.
    pub heights: Vec<f32>,
    /// Horizontal wave displacement under each vertex.
    pub horizontal: Vec<Vec2f>,
    pub sea_level: f32,
    /// Step index of the query this set answers.
    pub issued_step: u64,
}

/// Batched request: one horizontal position per hull vertex, in meters.
#[derive(Debug)]
pub struct HeightQuery {
    pub positions: Vec<Vec2f>,
    pub reply: SampleReply,
}

/// Completion handle for a [`HeightQuery`]. Consumed on completion, so each
/// query is answered at most once.
#[must_use = "a dropped reply never delivers its samples"]
#[derive(Debug)]
pub struct SampleReply {
    slot: Arc<Mutex<Option<HeightSampleSet>>>,
    issued_step: u64,
    units_per_meter: f32,
    discard_out_of_order: bool,
}

impl SampleReply {
    pub fn issued_step(&self) -> u64 {
        self.issued_step
    }

    /// Deliver per-position displacements (meters) and the sea level (world
    /// units). Elevation is `displacement.z * units_per_meter + sea_level`.
    ///
    /// An empty response is ignored and the previous sample set stays.
    pub fn complete(self, displacements: &[Vec3f], sea_level: f32) {
        if displacements.is_empty() {
            tracing::trace!(step = self.issued_step, "ignoring empty height response");
            return;
        }
        let units = self.units_per_meter;
        let set = HeightSampleSet {
            heights: displacements.iter().map(|d| d.z * units + sea_level).collect(),
            horizontal: displacements.iter().map(|d| Vec2f::new(d.x, d.y) * units).collect(),
            sea_level,
            issued_step: self.issued_step,
        };

        let mut slot = self.slot.lock();
        if self.discard_out_of_order {
            if let Some(current) = slot.as_ref() {
                if current.issued_step > set.issued_step {
                    tracing::trace!(
                        late = set.issued_step,
                        current = current.issued_step,
                        "discarding out-of-order height response"
                    );
                    return;
                }
            }
        }
        *slot = Some(set);
    }
}

/// Latest received sample set, shared between the step thread and whatever
/// thread completes replies. Locks are held only for the swap or the copy.
#[derive(Debug, Clone, Default)]
pub struct HeightSampleCache {
    slot: Arc<Mutex<Option<HeightSampleSet>>>,
}

impl HeightSampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, issued_step: u64, units_per_meter: f32, discard_out_of_order: bool) -> SampleReply {
        SampleReply {
            slot: Arc::clone(&self.slot),
            issued_step,
            units_per_meter,
            discard_out_of_order,
        }
    }

    /// Copy the latest heights into `out`, returning the step that issued
    /// them. `out` is left untouched when nothing has arrived yet.
    pub fn copy_latest(&self, out: &mut Vec<f32>) -> Option<u64> {
        let slot = self.slot.lock();
        let set = slot.as_ref()?;
        out.clear();
        out.extend_from_slice(&set.heights);
        Some(set.issued_step)
    }

    /// Elevation and horizontal displacement at one query position.
    pub fn sample_at(&self, index: usize) -> Option<(f32, Vec2f)> {
        let slot = self.slot.lock();
        let set = slot.as_ref()?;
        Some((*set.heights.get(index)?, set.horizontal.get(index).copied().unwrap_or(Vec2f::ZERO)))
    }

    pub fn has_samples(&self) -> bool {
        self.slot.lock().is_some()
    }

    pub(crate) fn clear(&self) {
        *self.slot.lock() = None;
    }
}

/// Anything that can answer height queries. Implementations may complete
/// the reply inline, stash it for a later step, or hand it to another
/// thread; a query that is never completed simply leaves the cache as is.
pub trait WaveFieldProvider {
    fn sample_displacements(&mut self, query: HeightQuery);
}

impl<F> WaveFieldProvider for F
where
    F: FnMut(HeightQuery),
{
    fn sample_displacements(&mut self, query: HeightQuery) {
        self(query)
    }
}

/// Flat water at a fixed elevation, answered immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StillWater {
    pub sea_level: f32,
}

impl WaveFieldProvider for StillWater {
    fn sample_displacements(&mut self, query: HeightQuery) {
        let displacements = vec![Vec3f::ZERO; query.positions.len()];
        query.reply.complete(&displacements, self.sea_level);
    }
}
