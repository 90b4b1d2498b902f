//! Wave-field providers that answer hull height queries inline, a fixed
//! number of steps later, on a worker thread, or never.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bevy_ecs::prelude::Resource;
use hull::{HeightQuery, SampleReply, Vec2f, WaveFieldProvider};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{GerstnerWaveField, ProviderArg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProviderMode {
    /// Answered during the query.
    Inline,
    /// Answered at the start of the step `latency_steps` after the query.
    /// A latency of 0 answers during the query, like `Inline`.
    Deferred { latency_steps: u32 },
    /// Answered by a worker thread after sleeping `latency_ms`.
    Threaded { latency_ms: u64 },
    /// Never answered.
    Silent,
}

impl Default for ProviderMode {
    fn default() -> Self {
        ProviderMode::Deferred { latency_steps: 1 }
    }
}

impl ProviderMode {
    /// Mode selected on the command line, keeping `current`'s latency when
    /// the variant is unchanged.
    pub fn from_arg(arg: ProviderArg, current: ProviderMode) -> Self {
        match (arg, current) {
            (ProviderArg::Deferred, ProviderMode::Deferred { .. }) | (ProviderArg::Threaded, ProviderMode::Threaded { .. }) => {
                current
            }
            (ProviderArg::Inline, _) => ProviderMode::Inline,
            (ProviderArg::Deferred, _) => ProviderMode::Deferred { latency_steps: 1 },
            (ProviderArg::Threaded, _) => ProviderMode::Threaded { latency_ms: 2 },
            (ProviderArg::Silent, _) => ProviderMode::Silent,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderStats {
    pub requests: u64,
    pub responses: u64,
}

struct Job {
    positions: Vec<Vec2f>,
    time: f32,
    reply: SampleReply,
}

struct PendingReply {
    due_tick: u64,
    job: Job,
}

enum Backend {
    Inline,
    Deferred { latency_steps: u64, pending: Vec<PendingReply> },
    Threaded(WaveWorker),
    Silent,
}

/// The simulator's wave field, exposed to hulls as a [`WaveFieldProvider`].
#[derive(Resource)]
pub struct WaveSource {
    field: Arc<GerstnerWaveField>,
    time: f32,
    tick: u64,
    backend: Backend,
    stats: Arc<Mutex<ProviderStats>>,
}

impl WaveSource {
    pub fn new(field: GerstnerWaveField, mode: ProviderMode) -> Self {
        let field = Arc::new(field);
        let stats = Arc::new(Mutex::new(ProviderStats::default()));
        let backend = match mode {
            ProviderMode::Inline => Backend::Inline,
            ProviderMode::Deferred { latency_steps } => Backend::Deferred {
                latency_steps: u64::from(latency_steps),
                pending: Vec::new(),
            },
            ProviderMode::Threaded { latency_ms } => Backend::Threaded(WaveWorker::spawn(
                Arc::clone(&field),
                Arc::clone(&stats),
                Duration::from_millis(latency_ms),
            )),
            ProviderMode::Silent => Backend::Silent,
        };
        Self { field, time: 0.0, tick: 0, backend, stats }
    }

    pub fn field(&self) -> &GerstnerWaveField {
        &self.field
    }

    pub fn stats(&self) -> ProviderStats {
        *self.stats.lock()
    }

    /// Move to a new step and deliver deferred answers that are due.
    pub fn advance(&mut self, tick: u64, time: f32) {
        self.tick = tick;
        self.time = time;
        if let Backend::Deferred { pending, .. } = &mut self.backend {
            let (due, waiting): (Vec<_>, Vec<_>) = pending.drain(..).partition(|p| p.due_tick <= tick);
            *pending = waiting;
            for p in due {
                answer(&self.field, &self.stats, p.job);
            }
        }
    }
}

impl WaveFieldProvider for WaveSource {
    fn sample_displacements(&mut self, query: HeightQuery) {
        self.stats.lock().requests += 1;
        let job = Job { positions: query.positions, time: self.time, reply: query.reply };
        match &mut self.backend {
            Backend::Inline => answer(&self.field, &self.stats, job),
            Backend::Deferred { latency_steps: 0, .. } => answer(&self.field, &self.stats, job),
            Backend::Deferred { latency_steps, pending } => pending.push(PendingReply {
                due_tick: self.tick + *latency_steps,
                job,
            }),
            Backend::Threaded(worker) => worker.submit(job),
            Backend::Silent => {}
        }
    }
}

fn answer(field: &GerstnerWaveField, stats: &Mutex<ProviderStats>, job: Job) {
    let displacements = field.sample(&job.positions, job.time);
    job.reply.complete(&displacements, field.sea_level());
    stats.lock().responses += 1;
}

/// Background sampler fed through a channel. Dropping it closes the channel
/// and joins the thread.
struct WaveWorker {
    jobs: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl WaveWorker {
    fn spawn(field: Arc<GerstnerWaveField>, stats: Arc<Mutex<ProviderStats>>, latency: Duration) -> Self {
        let (tx, rx): (Sender<Job>, Receiver<Job>) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("wave-sampler".into())
            .spawn(move || {
                for job in rx {
                    if !latency.is_zero() {
                        thread::sleep(latency);
                    }
                    answer(&field, &stats, job);
                }
                debug!("wave sampler exiting");
            });
        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(%err, "failed to spawn wave sampler; queries will go unanswered");
                None
            }
        };
        Self { jobs: Some(tx), handle }
    }

    fn submit(&self, job: Job) {
        if let Some(jobs) = &self.jobs {
            if jobs.send(job).is_err() {
                warn!("wave sampler is gone; dropping height query");
            }
        }
    }
}

impl Drop for WaveWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("wave sampler panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{RigidBody, WaveConfig, WavePreset};
    use hull::builtins::box_hull;
    use hull::{HullWaterController, HydroConfig, Quatf, Vec3f};

    fn calm() -> GerstnerWaveField {
        GerstnerWaveField::new(&WaveConfig { preset: WavePreset::Calm, ..WaveConfig::default() })
    }

    fn resting_box() -> (HullWaterController, RigidBody) {
        let hull = HullWaterController::from_mesh(HydroConfig::default(), &box_hull(Vec3f::ONE)).expect("valid box");
        let body = RigidBody::new(10.0, Vec3f::ONE, Vec3f::ZERO, Quatf::IDENTITY);
        (hull, body)
    }

    #[test]
    fn inline_answers_immediately() {
        let (mut hull, mut body) = resting_box();
        let mut source = WaveSource::new(calm(), ProviderMode::Inline);
        source.advance(0, 0.0);
        let summary = hull.step(&mut body, &mut source, 0.1);
        assert_eq!(summary.sample_age, Some(0));
        assert_eq!(source.stats(), ProviderStats { requests: 1, responses: 1 });
    }

    #[test]
    fn deferred_answers_after_latency() {
        let (mut hull, mut body) = resting_box();
        let mut source = WaveSource::new(calm(), ProviderMode::Deferred { latency_steps: 2 });

        for tick in 0..2 {
            source.advance(tick, tick as f32 * 0.1);
            let summary = hull.step(&mut body, &mut source, 0.1);
            assert!(!summary.samples_available, "tick {tick}");
        }
        source.advance(2, 0.2);
        assert!(hull.samples().has_samples(), "tick 0 reply is due at tick 2");
        let summary = hull.step(&mut body, &mut source, 0.1);
        assert_eq!(summary.sample_age, Some(2));
        assert_eq!(source.stats(), ProviderStats { requests: 3, responses: 1 });
    }

    #[test]
    fn zero_latency_deferred_answers_in_the_same_step() {
        let (mut hull, mut body) = resting_box();
        let mut source = WaveSource::new(calm(), ProviderMode::Deferred { latency_steps: 0 });
        source.advance(0, 0.0);
        let summary = hull.step(&mut body, &mut source, 0.1);
        assert!(summary.samples_available);
        assert_eq!(summary.sample_age, Some(0));
        assert_eq!(source.stats(), ProviderStats { requests: 1, responses: 1 });
    }

    #[test]
    fn silent_never_answers() {
        let (mut hull, mut body) = resting_box();
        let mut source = WaveSource::new(calm(), ProviderMode::Silent);
        for tick in 0..5 {
            source.advance(tick, 0.0);
            hull.step(&mut body, &mut source, 0.1);
        }
        assert!(!hull.samples().has_samples());
        assert_eq!(source.stats(), ProviderStats { requests: 5, responses: 0 });
    }

    #[test]
    fn threaded_answers_from_worker() {
        let (mut hull, mut body) = resting_box();
        let mut source = WaveSource::new(calm(), ProviderMode::Threaded { latency_ms: 1 });
        source.advance(0, 0.0);
        hull.step(&mut body, &mut source, 0.1);

        let deadline = Instant::now() + Duration::from_secs(5);
        while source.stats().responses < 1 {
            assert!(Instant::now() < deadline, "worker never answered");
            thread::sleep(Duration::from_millis(1));
        }
        assert!(hull.samples().has_samples());
        drop(source);
    }
}
