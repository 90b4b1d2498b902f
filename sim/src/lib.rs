mod args;
pub use args::{Args, ProviderArg};

mod config;
pub use config::{load_config, Config, HullConfig, HullShape};

mod body;
pub use body::RigidBody;

pub mod waves;
pub use waves::{GerstnerWaveField, WaveConfig, WavePreset};

mod provider;
pub use provider::{ProviderMode, ProviderStats, WaveSource};

mod app;
pub use app::{
    build_sim_app, hull_bodies, log_final_report, run_steps, Hull, LastHullStep, SimClock, SimSettings, SimStats,
};
