use bevy_ecs::prelude::Resource;
use clap::{Parser, ValueEnum};

use crate::{Config, ProviderMode, WavePreset};

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "hull-sim")]
#[command(about = "Headless buoyancy simulator for triangulated hulls", long_about = None)]
pub struct Args {
    /// Path to the TOML config; defaults are used when it does not exist
    #[arg(long, default_value = "sim.toml")]
    pub config: String,
    /// Number of steps to run (overrides the config)
    #[arg(long)]
    pub steps: Option<u32>,
    /// How height queries are answered (overrides the config)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,
    /// Wave preset (overrides the config)
    #[arg(long, value_enum)]
    pub waves: Option<WavePreset>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Inline,
    Deferred,
    Threaded,
    Silent,
}

impl Args {
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(steps) = self.steps {
            cfg.steps = steps;
        }
        if let Some(arg) = self.provider {
            cfg.provider = ProviderMode::from_arg(arg, cfg.provider);
        }
        if let Some(preset) = self.waves {
            cfg.waves.preset = preset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let args = Args::parse_from(["hull-sim", "--steps", "12", "--provider", "silent", "--waves", "storm"]);
        let mut cfg = Config::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.steps, 12);
        assert_eq!(cfg.provider, ProviderMode::Silent);
        assert_eq!(cfg.waves.preset, WavePreset::Storm);
    }

    #[test]
    fn same_provider_keeps_configured_latency() {
        let args = Args::parse_from(["hull-sim", "--provider", "deferred"]);
        let mut cfg = Config { provider: ProviderMode::Deferred { latency_steps: 4 }, ..Config::default() };
        args.apply(&mut cfg);
        assert_eq!(cfg.provider, ProviderMode::Deferred { latency_steps: 4 });
        assert_eq!(cfg.steps, Config::default().steps);
    }
}
