use anyhow::{Context, Result};
use bevy_app::{App, Update};
use bevy_ecs::prelude::*;
use hull::{HullStepSummary, HullWaterController, Vec3f};
use tracing::info;

use crate::{Config, GerstnerWaveField, RigidBody, WaveSource};

#[derive(Resource, Debug, Clone, Copy)]
pub struct SimClock {
    pub dt: f32,
    pub tick: u64,
    pub time: f32,
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct SimSettings {
    pub gravity: Vec3f,
    pub log_every: u32,
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimStats {
    pub steps: u64,
    pub peak_sample_age: u64,
    pub total_impulses: u64,
}

#[derive(Component, Debug)]
pub struct Hull(pub HullWaterController);

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LastHullStep(pub HullStepSummary);

pub fn build_sim_app(cfg: Config) -> Result<App> {
    cfg.validate()?;
    let controller = HullWaterController::from_mesh(cfg.hydro.clone(), &cfg.hull.mesh())
        .context("building hull controller")?;
    let body = cfg.hull.rigid_body();
    let field = GerstnerWaveField::new(&cfg.waves);
    info!(
        shape = ?cfg.hull.shape,
        mass = body.mass,
        total_area = controller.total_area(),
        hull_length = controller.hull_length(),
        provider = ?cfg.provider,
        "Hull spawned"
    );

    let mut app = App::new();
    app.insert_resource(SimClock { dt: cfg.dt, tick: 0, time: 0.0 })
        .insert_resource(SimSettings {
            gravity: Vec3f::new(0.0, 0.0, cfg.hydro.gravity),
            log_every: cfg.log_every,
        })
        .init_resource::<SimStats>()
        .insert_resource(WaveSource::new(field, cfg.provider))
        .add_systems(
            Update,
            (advance_waves, step_hulls, integrate_bodies, log_progress, advance_clock).chain(),
        );
    app.world_mut().spawn((Hull(controller), body, LastHullStep::default()));
    Ok(app)
}

pub fn run_steps(app: &mut App, steps: u32) {
    for _ in 0..steps {
        app.update();
    }
}

/// Snapshot of every hull's body and its most recent step.
pub fn hull_bodies(app: &mut App) -> Vec<(RigidBody, HullStepSummary)> {
    let mut query = app.world_mut().query::<(&RigidBody, &LastHullStep)>();
    query
        .iter(app.world())
        .map(|(body, last)| (body.clone(), last.0))
        .collect()
}

pub fn log_final_report(app: &mut App) {
    let stats = app.world().get_resource::<SimStats>().copied().unwrap_or_default();
    let (provider, sea_level, max_amplitude) = app
        .world()
        .get_resource::<WaveSource>()
        .map(|w| (w.stats(), w.field().sea_level(), w.field().max_amplitude()))
        .unwrap_or_default();
    info!(
        steps = stats.steps,
        peak_sample_age = stats.peak_sample_age,
        total_impulses = stats.total_impulses,
        requests = provider.requests,
        responses = provider.responses,
        sea_level,
        max_amplitude,
        "Simulation finished"
    );
    for (body, last) in hull_bodies(app) {
        info!(
            position = ?body.position,
            velocity = ?body.linear_velocity,
            up = ?body.up(),
            submerged_area = last.submerged_area,
            submerged_length = last.submerged_length,
            "Final hull state"
        );
    }
}

fn advance_waves(clock: Res<SimClock>, mut waves: ResMut<WaveSource>) {
    waves.advance(clock.tick, clock.time);
}

fn step_hulls(
    clock: Res<SimClock>,
    mut waves: ResMut<WaveSource>,
    mut stats: ResMut<SimStats>,
    mut hulls: Query<(&mut Hull, &mut RigidBody, &mut LastHullStep)>,
) {
    for (mut hull, mut body, mut last) in &mut hulls {
        let summary = hull.0.step(&mut *body, &mut *waves, clock.dt);
        if let Some(age) = summary.sample_age {
            stats.peak_sample_age = stats.peak_sample_age.max(age);
        }
        stats.total_impulses += summary.impulses_applied as u64;
        last.0 = summary;
    }
}

fn integrate_bodies(clock: Res<SimClock>, settings: Res<SimSettings>, mut bodies: Query<&mut RigidBody>) {
    for mut body in &mut bodies {
        body.integrate(settings.gravity, clock.dt);
    }
}

fn log_progress(clock: Res<SimClock>, settings: Res<SimSettings>, hulls: Query<(&RigidBody, &LastHullStep)>) {
    if settings.log_every == 0 || clock.tick % u64::from(settings.log_every) != 0 {
        return;
    }
    for (body, last) in &hulls {
        info!(
            tick = clock.tick,
            time = clock.time,
            z = body.position.z,
            vz = body.linear_velocity.z,
            tilt = body.up().angle_between(Vec3f::Z),
            full = last.0.full,
            sample_age = ?last.0.sample_age,
            force = ?last.0.total_force,
            "Hull"
        );
    }
}

fn advance_clock(mut clock: ResMut<SimClock>, mut stats: ResMut<SimStats>) {
    clock.tick += 1;
    clock.time += clock.dt;
    stats.steps += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_runs_and_counts_steps() {
        let cfg = Config { steps: 5, log_every: 0, ..Config::default() };
        let mut app = build_sim_app(cfg).expect("default config builds");
        run_steps(&mut app, 5);
        let clock = *app.world().resource::<SimClock>();
        assert_eq!(clock.tick, 5);
        assert_eq!(app.world().resource::<SimStats>().steps, 5);
        let bodies = hull_bodies(&mut app);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].1.step, 4);
    }

    #[test]
    fn wave_source_carries_configured_field() {
        let mut cfg = Config { steps: 2, log_every: 0, ..Config::default() };
        cfg.waves.sea_level = 1.5;
        let mut app = build_sim_app(cfg).expect("config builds");
        run_steps(&mut app, 2);
        let field = app.world().resource::<WaveSource>().field();
        assert_eq!(field.sea_level(), 1.5);
        assert!(field.max_amplitude() >= 0.0);
        log_final_report(&mut app);
    }

    #[test]
    fn invalid_config_fails_to_build() {
        let mut cfg = Config::default();
        cfg.hull.mass = 0.0;
        assert!(build_sim_app(cfg).is_err());
    }
}
