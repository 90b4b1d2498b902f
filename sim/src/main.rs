use anyhow::Result;
use clap::Parser;
use tracing::info;

use sim::{build_sim_app, load_config, log_final_report, run_steps, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    args.apply(&mut cfg);
    info!(?cfg, "Sim config loaded");

    let steps = cfg.steps;
    let mut app = build_sim_app(cfg)?;
    app.insert_resource(args);
    run_steps(&mut app, steps);
    log_final_report(&mut app);
    Ok(())
}
