use std::path::Path;

use anyhow::{ensure, Context, Result};
use hull::builtins::{box_hull, skiff_hull};
use hull::{hydro_presets, HullMesh, HydroConfig, Quatf, Vec3f};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ProviderMode, RigidBody, WaveConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub steps: u32,
    /// Fixed step in seconds.
    pub dt: f32,
    /// Progress is logged every this many steps; 0 disables it.
    pub log_every: u32,
    pub hull: HullConfig,
    pub hydro: HydroConfig,
    pub waves: WaveConfig,
    pub provider: ProviderMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steps: 600,
            dt: 1.0 / 60.0,
            log_every: 60,
            hull: HullConfig::default(),
            hydro: hydro_presets::small_craft(),
            waves: WaveConfig::default(),
            provider: ProviderMode::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.dt.is_finite() && self.dt > 0.0, "dt must be positive, got {}", self.dt);
        ensure!(
            self.hull.mass.is_finite() && self.hull.mass > 0.0,
            "hull mass must be positive, got {}",
            self.hull.mass
        );
        ensure!(
            self.hull.half_extents.iter().all(|h| h.is_finite() && *h > 0.0),
            "hull half extents must be positive, got {:?}",
            self.hull.half_extents
        );
        self.hydro.validate().context("invalid [hydro] section")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HullShape {
    #[default]
    Box,
    Skiff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    pub shape: HullShape,
    /// Box half extents in meters; also the inertia box for the skiff.
    pub half_extents: [f32; 3],
    pub mass: f32,
    /// Starting centre of mass.
    pub start: [f32; 3],
    pub yaw_deg: f32,
    pub roll_deg: f32,
    /// Fraction of angular velocity removed per second.
    pub angular_damping: f32,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            shape: HullShape::Box,
            half_extents: [1.0, 0.5, 0.25],
            mass: 200.0,
            start: [0.0, 0.0, 0.35],
            yaw_deg: 0.0,
            roll_deg: 0.0,
            angular_damping: 0.2,
        }
    }
}

impl HullConfig {
    pub fn mesh(&self) -> HullMesh {
        match self.shape {
            HullShape::Box => box_hull(Vec3f::from_array(self.half_extents)),
            HullShape::Skiff => skiff_hull(),
        }
    }

    pub fn orientation(&self) -> Quatf {
        Quatf::from_rotation_z(self.yaw_deg.to_radians()) * Quatf::from_rotation_x(self.roll_deg.to_radians())
    }

    pub fn rigid_body(&self) -> RigidBody {
        let half_extents = match self.shape {
            HullShape::Box => Vec3f::from_array(self.half_extents),
            HullShape::Skiff => Vec3f::new(1.5, 0.55, 0.3),
        };
        let mut body = RigidBody::new(self.mass, half_extents, Vec3f::from_array(self.start), self.orientation());
        body.angular_damping = self.angular_damping;
        body
    }
}

pub fn load_config(path: &str) -> Result<Config> {
    let path = Path::new(path);
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: Config = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
