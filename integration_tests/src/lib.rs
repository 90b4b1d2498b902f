#[cfg(test)]
mod integration {
    use std::thread;
    use std::time::{Duration, Instant};

    use anyhow::{bail, Result};
    use bevy_app::App;
    use hull::{RecordingObserver, Vec3f};
    use sim::{
        build_sim_app, hull_bodies, Config, Hull, HullConfig, HullShape, ProviderMode, SimStats, WaveConfig,
        WavePreset, WaveSource,
    };
    use tracing::info;

    const SIM_DT: f32 = 1.0 / 60.0;
    const SETTLE_STEPS: usize = 600;
    const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    /// Run one update, then block until the worker thread has answered every
    /// query issued so far, so each step sees exactly one step of latency.
    fn advance_app(app: &mut App) -> Result<()> {
        app.update();
        let deadline = Instant::now() + RESPONSE_TIMEOUT;
        loop {
            let stats = app.world().resource::<WaveSource>().stats();
            if stats.responses >= stats.requests {
                return Ok(());
            }
            if Instant::now() > deadline {
                bail!("wave worker stalled: {stats:?}");
            }
            thread::sleep(Duration::from_micros(200));
        }
    }

    fn threaded_config(hull: HullConfig, preset: WavePreset) -> Config {
        Config {
            dt: SIM_DT,
            log_every: 0,
            hull,
            waves: WaveConfig { preset, ..WaveConfig::default() },
            provider: ProviderMode::Threaded { latency_ms: 0 },
            ..Config::default()
        }
    }

    #[test]
    fn box_floats_with_cross_thread_sampling() -> Result<()> {
        init_tracing();
        let mut app = build_sim_app(threaded_config(HullConfig::default(), WavePreset::Still))?;

        for _ in 0..SETTLE_STEPS {
            advance_app(&mut app)?;
        }

        let (body, last) = hull_bodies(&mut app).pop().expect("one hull");
        let bottom = body.position.z - 0.25;
        info!(?body.position, bottom, "settled");
        assert!((-0.4..=0.15).contains(&bottom), "bottom at {bottom}");
        assert!(last.samples_available);
        assert!(last.full >= 2, "bottom faces should be under water: {last:?}");

        let stats = *app.world().resource::<SimStats>();
        assert_eq!(stats.peak_sample_age, 1, "worker answers within one step");
        assert!(stats.total_impulses > 0);
        Ok(())
    }

    #[test]
    fn yawed_box_rides_lake_waves() -> Result<()> {
        init_tracing();
        let hull = HullConfig { yaw_deg: 30.0, ..HullConfig::default() };
        let mut app = build_sim_app(threaded_config(hull, WavePreset::Lake))?;

        let recorder = RecordingObserver::new();
        {
            let world = app.world_mut();
            let mut hulls = world.query::<&mut Hull>();
            for mut hull in hulls.iter_mut(world) {
                hull.0.set_observer(recorder.clone());
            }
        }

        for _ in 0..SETTLE_STEPS {
            advance_app(&mut app)?;
        }

        let (body, _) = hull_bodies(&mut app).pop().expect("one hull");
        assert!(
            body.position.is_finite() && body.linear_velocity.is_finite() && body.angular_velocity.is_finite(),
            "non-finite state: {body:?}"
        );
        let bottom = body.position.z - 0.25;
        assert!((-0.5..=0.3).contains(&bottom), "bottom at {bottom}");
        assert!(body.up().z > 0.9, "box capsized: up = {:?}", body.up());

        let rec = recorder.snapshot();
        assert_eq!(rec.steps.len(), SETTLE_STEPS);
        assert!(rec.steps.iter().skip(1).all(|s| s.samples_available));
        assert!(rec
            .reports
            .iter()
            .filter_map(|r| r.forces)
            .all(|f| f.total().is_finite() && f.normal.dot(Vec3f::Z) < 0.0));
        Ok(())
    }

    #[test]
    fn skiff_settles_in_still_water() -> Result<()> {
        init_tracing();
        let hull = HullConfig {
            shape: HullShape::Skiff,
            mass: 250.0,
            start: [0.0, 0.0, 0.5],
            ..HullConfig::default()
        };
        let mut app = build_sim_app(threaded_config(hull, WavePreset::Still))?;
        for _ in 0..SETTLE_STEPS {
            advance_app(&mut app)?;
        }

        let (body, last) = hull_bodies(&mut app).pop().expect("one hull");
        // The skiff's keel sits 0.3 m below its centre.
        let keel = body.position.z - 0.3;
        assert!((-0.3..=0.05).contains(&keel), "keel at {keel}");
        assert!(last.submerged_length > 0.0 && last.submerged_length < 3.1, "{last:?}");
        Ok(())
    }
}
