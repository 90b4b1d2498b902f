use serde::{Deserialize, Serialize};

use crate::HullError;

/// Physical and tuning constants for one hull. Every hull owns its own copy,
/// so two hulls in the same world can be tuned independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydroConfig {
    /// Scales the hydrostatic and viscous terms. The default is the fitted
    /// value of the centimetre-based tuning, not a physical density.
    pub density_of_water: f32,
    /// Signed vertical gravity component (negative = down). Buoyant weight is
    /// `gravity * mass`, so it carries this sign into the hydrostatic term.
    pub gravity: f32,
    pub linear_pressure_drag: f32,
    pub quadratic_pressure_drag: f32,
    pub pressure_falloff_power: f32,
    pub linear_suction_drag: f32,
    pub quadratic_suction_drag: f32,
    pub suction_falloff_power: f32,
    pub kinematic_viscosity: f32,
    /// Reynolds floor applied before the skin-friction log. The friction line
    /// has a pole at Re = 100, so keep this above it.
    pub min_reynolds: f32,
    /// Velocity magnitudes at or below this are treated as at rest.
    pub min_speed: f32,
    /// World units per meter. Query positions go out in meters, displacement
    /// heights come back scaled by this, and rest areas are stored in m².
    pub units_per_meter: f32,
    /// When false each step's force is applied directly as an impulse.
    pub scale_impulse_by_dt: bool,
    /// Keep a newer sample set when an older reply arrives late.
    pub discard_out_of_order_samples: bool,
    /// Fail initialization on open or inward-wound meshes instead of warning.
    pub strict_mesh_validation: bool,
}

impl Default for HydroConfig {
    fn default() -> Self {
        Self {
            density_of_water: 0.00001,
            gravity: -9.81,
            linear_pressure_drag: 2500.0,
            quadratic_pressure_drag: 2500.0,
            pressure_falloff_power: 0.5,
            linear_suction_drag: 2500.0,
            quadratic_suction_drag: 2500.0,
            suction_falloff_power: 0.5,
            kinematic_viscosity: 0.00001002,
            min_reynolds: 1.0e3,
            min_speed: 1.0e-6,
            units_per_meter: 1.0,
            scale_impulse_by_dt: false,
            discard_out_of_order_samples: false,
            strict_mesh_validation: false,
        }
    }
}

impl HydroConfig {
    pub fn validate(&self) -> Result<(), HullError> {
        let positive = [
            ("density_of_water", self.density_of_water),
            ("kinematic_viscosity", self.kinematic_viscosity),
            ("units_per_meter", self.units_per_meter),
            ("min_reynolds", self.min_reynolds),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(HullError::InvalidConfig(format!("{name} must be finite and positive, got {value}")));
            }
        }
        let non_negative = [
            ("linear_pressure_drag", self.linear_pressure_drag),
            ("quadratic_pressure_drag", self.quadratic_pressure_drag),
            ("pressure_falloff_power", self.pressure_falloff_power),
            ("linear_suction_drag", self.linear_suction_drag),
            ("quadratic_suction_drag", self.quadratic_suction_drag),
            ("suction_falloff_power", self.suction_falloff_power),
            ("min_speed", self.min_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(HullError::InvalidConfig(format!("{name} must be finite and non-negative, got {value}")));
            }
        }
        if !self.gravity.is_finite() {
            return Err(HullError::InvalidConfig(format!("gravity must be finite, got {}", self.gravity)));
        }
        Ok(())
    }
}

pub mod hydro_presets {
    use super::*;

    /// Centimetre world with gravity in cm/s², the scale the default drag
    /// and density constants were fitted against.
    pub fn centimeter_world() -> HydroConfig {
        HydroConfig {
            gravity: -980.0,
            units_per_meter: 100.0,
            ..HydroConfig::default()
        }
    }

    /// SI tuning for a few-hundred-kilogram craft stepped at 30-120 Hz.
    pub fn small_craft() -> HydroConfig {
        HydroConfig {
            density_of_water: 5.0,
            linear_pressure_drag: 40.0,
            quadratic_pressure_drag: 40.0,
            linear_suction_drag: 40.0,
            quadratic_suction_drag: 40.0,
            scale_impulse_by_dt: true,
            ..HydroConfig::default()
        }
    }
}
