//! Gerstner wave field used as the simulator's water surface.
//!
//! Displacements are returned relative to the sea level, in meters, with
//! the vertical component along +Z and the horizontal plane on (x, y).

use std::f32::consts::PI;

use clap::ValueEnum;
use hull::{Vec2f, Vec3f};
use serde::{Deserialize, Serialize};

/// One wave train.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveTrain {
    /// Travel direction on the (x, y) plane; normalized on use.
    pub direction: [f32; 2],
    /// 0 gives a sine wave, 1 a sharp crest.
    pub steepness: f32,
    /// Meters.
    pub wavelength: f32,
    /// Phase speed in m/s.
    pub speed: f32,
}

impl WaveTrain {
    pub const fn new(direction: [f32; 2], steepness: f32, wavelength: f32, speed: f32) -> Self {
        Self { direction, steepness, wavelength, speed }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WavePreset {
    Still,
    #[default]
    Calm,
    Lake,
    Ocean,
    Storm,
}

impl WavePreset {
    /// Wave trains and the preset's own amplitude multiplier.
    pub fn trains(self) -> (Vec<WaveTrain>, f32) {
        match self {
            WavePreset::Still => (Vec::new(), 0.0),
            WavePreset::Calm => (vec![WaveTrain::new([1.0, 0.2], 0.2, 6.0, 0.5)], 0.3),
            WavePreset::Lake => (
                vec![
                    WaveTrain::new([1.0, 0.0], 0.3, 4.0, 0.8),
                    WaveTrain::new([0.3, 1.0], 0.2, 2.5, 1.0),
                ],
                0.5,
            ),
            WavePreset::Ocean => (
                vec![
                    WaveTrain::new([1.0, 0.3], 0.6, 8.0, 1.5),
                    WaveTrain::new([-0.7, 1.0], 0.5, 5.0, 1.8),
                    WaveTrain::new([0.5, -1.0], 0.4, 3.0, 2.2),
                    WaveTrain::new([-1.0, -0.5], 0.3, 1.5, 2.8),
                ],
                1.0,
            ),
            WavePreset::Storm => (
                vec![
                    WaveTrain::new([1.0, 0.2], 0.8, 12.0, 2.0),
                    WaveTrain::new([-0.5, 1.0], 0.7, 8.0, 2.5),
                    WaveTrain::new([0.7, -0.7], 0.6, 5.0, 3.0),
                    WaveTrain::new([-1.0, -0.3], 0.5, 3.0, 3.5),
                ],
                2.0,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub preset: WavePreset,
    /// Absolute elevation of the undisturbed surface.
    pub sea_level: f32,
    /// Multiplies the preset's amplitudes.
    pub amplitude_scale: f32,
    /// Replaces the preset's trains when non-empty.
    pub trains: Vec<WaveTrain>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            preset: WavePreset::Calm,
            sea_level: 0.0,
            amplitude_scale: 1.0,
            trains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WaveConstants {
    k: f32,
    omega: f32,
    amplitude: f32,
    direction: Vec2f,
}

#[derive(Debug, Clone)]
pub struct GerstnerWaveField {
    sea_level: f32,
    waves: Vec<WaveConstants>,
}

impl GerstnerWaveField {
    pub fn new(cfg: &WaveConfig) -> Self {
        let (preset_trains, preset_scale) = cfg.preset.trains();
        let (trains, scale) = if cfg.trains.is_empty() {
            (preset_trains, preset_scale * cfg.amplitude_scale)
        } else {
            (cfg.trains.clone(), cfg.amplitude_scale)
        };

        let waves = trains
            .iter()
            .map(|t| {
                let k = 2.0 * PI / t.wavelength.max(0.1);
                WaveConstants {
                    k,
                    omega: k * t.speed,
                    amplitude: (t.steepness.clamp(0.0, 1.0) / k) * scale,
                    direction: Vec2f::from_array(t.direction).normalize_or_zero(),
                }
            })
            .collect();
        Self { sea_level: cfg.sea_level, waves }
    }

    pub fn sea_level(&self) -> f32 {
        self.sea_level
    }

    /// Upper bound on the vertical displacement anywhere.
    pub fn max_amplitude(&self) -> f32 {
        self.waves.iter().map(|w| w.amplitude).sum()
    }

    /// Surface displacement above `point` at `time`, relative to sea level.
    pub fn displacement(&self, point: Vec2f, time: f32) -> Vec3f {
        let mut out = Vec3f::ZERO;
        for w in &self.waves {
            let phase = w.k * w.direction.dot(point) - w.omega * time;
            let (sin_phase, cos_phase) = phase.sin_cos();
            out.z += w.amplitude * cos_phase;
            out.x += w.direction.x * w.amplitude * sin_phase;
            out.y += w.direction.y * w.amplitude * sin_phase;
        }
        out
    }

    pub fn sample(&self, points: &[Vec2f], time: f32) -> Vec<Vec3f> {
        points.iter().map(|p| self.displacement(*p, time)).collect()
    }
}
