use crate::sampling::{HeightQuery, HeightSampleCache, WaveFieldProvider};
use crate::{Vec2f, Vec3f};

/// Single-point floater: keeps an object riding the wave surface above a
/// fixed horizontal anchor, without any force model.
#[derive(Debug, Clone)]
pub struct SurfaceFollower {
    anchor: Vec3f,
    units_per_meter: f32,
    samples: HeightSampleCache,
    step_index: u64,
}

impl SurfaceFollower {
    pub fn new(anchor: Vec3f, units_per_meter: f32) -> Self {
        Self {
            anchor,
            units_per_meter,
            samples: HeightSampleCache::new(),
            step_index: 0,
        }
    }

    pub fn anchor(&self) -> Vec3f {
        self.anchor
    }

    /// Request a fresh sample and return the position implied by the latest
    /// one received, or `None` while nothing has arrived.
    pub fn step<W: WaveFieldProvider + ?Sized>(&mut self, waves: &mut W) -> Option<Vec3f> {
        let position = Vec2f::new(self.anchor.x, self.anchor.y) / self.units_per_meter;
        waves.sample_displacements(HeightQuery {
            positions: vec![position],
            reply: self.samples.reply(self.step_index, self.units_per_meter, false),
        });
        self.step_index += 1;

        let (height, offset) = self.samples.sample_at(0)?;
        Some(Vec3f::new(self.anchor.x + offset.x, self.anchor.y + offset.y, height))
    }
}
