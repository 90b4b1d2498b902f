use sim::{build_sim_app, hull_bodies, run_steps, Config, ProviderMode, SimStats, WaveConfig, WavePreset};

fn config(provider: ProviderMode, preset: WavePreset) -> Config {
    Config {
        log_every: 0,
        provider,
        waves: WaveConfig { preset, ..WaveConfig::default() },
        ..Config::default()
    }
}

#[test]
fn box_without_samples_sinks() {
    let mut app = build_sim_app(config(ProviderMode::Silent, WavePreset::Calm)).expect("app builds");
    run_steps(&mut app, 120);

    let (body, last) = hull_bodies(&mut app).pop().expect("one hull");
    assert!(body.position.z < -10.0, "expected free fall, z = {}", body.position.z);
    assert!(!last.samples_available);
    assert_eq!(app.world().resource::<SimStats>().total_impulses, 0);
}

#[test]
fn dropped_box_settles_at_the_waterline() {
    let mut app = build_sim_app(config(ProviderMode::Deferred { latency_steps: 1 }, WavePreset::Still))
        .expect("app builds");
    run_steps(&mut app, 600);

    let (body, last) = hull_bodies(&mut app).pop().expect("one hull");
    assert!(body.position.is_finite() && body.linear_velocity.is_finite());
    // Bottom 0.25 m below the centre; equilibrium puts it about 0.1 m under.
    let bottom = body.position.z - 0.25;
    assert!((-0.4..=0.15).contains(&bottom), "bottom at {bottom}");
    assert!(body.linear_velocity.z.abs() < 0.5, "still bobbing hard: {:?}", body.linear_velocity);
    assert!(last.samples_available);

    let stats = *app.world().resource::<SimStats>();
    assert!(stats.total_impulses > 0);
    assert_eq!(stats.peak_sample_age, 1, "one-step deferral");
}

#[test]
fn box_rides_calm_waves() {
    let mut app = build_sim_app(config(ProviderMode::Inline, WavePreset::Calm)).expect("app builds");
    run_steps(&mut app, 600);

    let (body, _) = hull_bodies(&mut app).pop().expect("one hull");
    let bottom = body.position.z - 0.25;
    assert!((-0.5..=0.2).contains(&bottom), "bottom at {bottom}");
    assert!(body.up().z > 0.9, "box capsized: up = {:?}", body.up());
    assert_eq!(app.world().resource::<SimStats>().peak_sample_age, 0);
}

#[test]
fn skiff_preset_floats() {
    let mut cfg = config(ProviderMode::Inline, WavePreset::Still);
    cfg.hull = sim::HullConfig {
        shape: sim::HullShape::Skiff,
        mass: 250.0,
        start: [0.0, 0.0, 0.5],
        ..sim::HullConfig::default()
    };
    let mut app = build_sim_app(cfg).expect("app builds");
    run_steps(&mut app, 600);

    let (body, last) = hull_bodies(&mut app).pop().expect("one hull");
    let keel = body.position.z - 0.3;
    assert!((-0.3..=0.05).contains(&keel), "keel at {keel}");
    assert!(last.full >= 2, "{last:?}");
}
