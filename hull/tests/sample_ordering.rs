use hull::{
    builtins::box_hull, HeightQuery, HullPose, HullWaterController, HydroConfig, RigidBodyHost, SampleReply,
    Vec3f, WaveFieldProvider,
};

struct FixedBody {
    impulses: usize,
}

impl RigidBodyHost for FixedBody {
    fn pose(&self) -> HullPose {
        HullPose::IDENTITY
    }
    fn linear_velocity(&self) -> Vec3f {
        Vec3f::ZERO
    }
    fn angular_velocity(&self) -> Vec3f {
        Vec3f::ZERO
    }
    fn center_of_mass(&self) -> Vec3f {
        Vec3f::ZERO
    }
    fn mass(&self) -> f32 {
        100.0
    }
    fn apply_impulse_at_point(&mut self, impulse: Vec3f, _point: Vec3f) {
        if impulse != Vec3f::ZERO {
            self.impulses += 1;
        }
    }
}

/// Holds every reply so the test decides when, and in which order, they land.
#[derive(Default)]
struct HeldReplies {
    pending: Vec<(SampleReply, usize)>,
}

impl WaveFieldProvider for HeldReplies {
    fn sample_displacements(&mut self, query: HeightQuery) {
        let n = query.positions.len();
        self.pending.push((query.reply, n));
    }
}

impl HeldReplies {
    fn take(&mut self, issued_step: u64) -> (SampleReply, usize) {
        let at = self
            .pending
            .iter()
            .position(|(reply, _)| reply.issued_step() == issued_step)
            .expect("reply for step");
        self.pending.remove(at)
    }
}

/// Step 0's answer puts the sea 1 m below the box, step 1's puts it 1 m
/// above. Step 1's answer arrives first.
fn run_out_of_order(cfg: HydroConfig) -> hull::HullStepSummary {
    let mut controller =
        HullWaterController::from_mesh(cfg, &box_hull(Vec3f::new(1.0, 0.5, 0.25))).expect("box hull is valid");
    let mut body = FixedBody { impulses: 0 };
    let mut waves = HeldReplies::default();
    let dt = 1.0 / 60.0;

    controller.step(&mut body, &mut waves, dt);
    controller.step(&mut body, &mut waves, dt);

    let (late, n) = waves.take(1);
    late.complete(&vec![Vec3f::new(0.0, 0.0, 1.0); n], 0.0);
    let (early, n) = waves.take(0);
    early.complete(&vec![Vec3f::new(0.0, 0.0, -1.0); n], 0.0);

    controller.step(&mut body, &mut waves, dt)
}

#[test]
fn last_writer_wins_by_default() {
    let summary = run_out_of_order(HydroConfig::default());
    assert!(summary.samples_available);
    assert_eq!(summary.sample_age, Some(2), "older reply landed last and is used");
    assert_eq!(summary.full, 0, "the sea is below the box in the older reply");
    assert_eq!(summary.dry, 12);
}

#[test]
fn out_of_order_replies_can_be_discarded() {
    let cfg = HydroConfig { discard_out_of_order_samples: true, ..HydroConfig::default() };
    let summary = run_out_of_order(cfg);
    assert_eq!(summary.sample_age, Some(1), "newer reply is kept");
    assert_eq!(summary.full, 12);
    assert_eq!(summary.impulses_applied, 2);
}

#[test]
fn stale_samples_keep_being_used_until_replaced() {
    let mut controller = HullWaterController::from_mesh(HydroConfig::default(), &box_hull(Vec3f::ONE))
        .expect("box hull is valid");
    let mut body = FixedBody { impulses: 0 };
    let mut waves = HeldReplies::default();

    controller.step(&mut body, &mut waves, 0.1);
    let (first, n) = waves.take(0);
    first.complete(&vec![Vec3f::ZERO; n], 0.0);

    let ages: Vec<Option<u64>> = (0..4).map(|_| controller.step(&mut body, &mut waves, 0.1).sample_age).collect();
    assert_eq!(ages, vec![Some(1), Some(2), Some(3), Some(4)]);
    assert!(body.impulses > 0);
}
