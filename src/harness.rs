//! Harness driver
//!
//! Lifecycle: `Configured → EngineReady → Running → Joined → Reported`, with
//! `Failed` when the shared state cannot be allocated. [`Harness`] is the
//! validated configuration, [`ReadyHarness`] owns the initialized engine, and
//! [`ReadyHarness::run`] consumes it, so no phase can be entered twice.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, error, info};

use crate::affinity::cpu_for_worker;
use crate::config::Config;
use crate::counter::WorkCounter;
use crate::engine::Engine;
use crate::error::HarnessError;
use crate::fingerprint::AtomicFingerprint;
use crate::report::Report;
use crate::template::WorkTemplate;
use crate::worker::WorkerContext;

/// Driver lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configured,
    EngineReady,
    Running,
    Joined,
    Reported,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Configured => "configured",
            Phase::EngineReady => "engine ready",
            Phase::Running => "running",
            Phase::Joined => "joined",
            Phase::Reported => "reported",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Validated configuration, engine not yet allocated
pub struct Harness<E: Engine> {
    config: Config,
    template: WorkTemplate,
    _engine: PhantomData<fn() -> E>,
}

impl<E: Engine> Harness<E> {
    pub fn new(config: Config) -> Result<Self, HarnessError> {
        config.validate()?;
        info!(
            "[{}] {} thread(s), {} nonces, seed {}, {}",
            Phase::Configured,
            config.threads,
            config.nonces,
            config.seed,
            config.strategy
        );
        Ok(Self {
            config,
            template: WorkTemplate::default(),
            _engine: PhantomData,
        })
    }

    /// Hash a different template
    pub fn with_template(mut self, template: WorkTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Allocate and initialize the shared engine state
    pub fn prepare(self) -> Result<ReadyHarness<E>, HarnessError> {
        let mut engine = match E::allocate(&self.config.engine) {
            Ok(engine) => engine,
            Err(err) => {
                error!("[{}] {}", Phase::Failed, err);
                return Err(err.into());
            }
        };

        let start = Instant::now();
        engine.initialize(&self.config.seed_bytes(), self.config.init_threads);
        info!(
            "[{}] initialized in {:.2}s",
            Phase::EngineReady,
            start.elapsed().as_secs_f64()
        );

        Ok(ReadyHarness {
            config: self.config,
            template: Arc::new(self.template),
            engine: Arc::new(engine),
        })
    }
}

/// Initialized engine, ready to launch workers
pub struct ReadyHarness<E: Engine> {
    config: Config,
    template: Arc<WorkTemplate>,
    engine: Arc<E>,
}

impl<E: Engine> ReadyHarness<E> {
    /// Shared engine state
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run all workers to completion and report the fingerprint
    pub fn run(self) -> Result<Report, HarnessError> {
        let ReadyHarness {
            config,
            template,
            engine,
        } = self;

        let counter = Arc::new(WorkCounter::new());
        let accumulator = Arc::new(AtomicFingerprint::new());
        let worker_fn = config.strategy.worker_fn::<E>();

        info!("[{}] launching {} worker(s)", Phase::Running, config.threads);
        let start = Instant::now();

        let mut handles: Vec<JoinHandle<u64>> = Vec::with_capacity(config.threads);
        for index in 0..config.threads {
            let ctx = WorkerContext {
                index,
                cpu: cpu_for_worker(config.affinity, index),
                vm: E::create_vm(&engine),
                counter: Arc::clone(&counter),
                accumulator: Arc::clone(&accumulator),
                template: Arc::clone(&template),
                bound: config.nonces,
            };

            let spawned = thread::Builder::new()
                .name(format!("uhash-worker-{}", index))
                .spawn(move || worker_fn(ctx));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    // Workers already started still run to completion; the
                    // spawn error takes precedence over a panic among them
                    if let Err(err) = join_all(handles) {
                        error!("after failing to spawn worker {}: {}", index, err);
                    }
                    return Err(HarnessError::Spawn { index, source });
                }
            }
        }

        let per_worker = join_all(handles)?;
        let elapsed = start.elapsed();
        let claims = counter.peek();
        debug!(
            "[{}] {} values issued for bound {}",
            Phase::Joined,
            claims,
            config.nonces
        );

        let fingerprint = accumulator.read();
        drop(engine);

        let report = Report {
            fingerprint,
            strategy: config.strategy,
            threads: config.threads,
            nonces: config.nonces,
            hashes: per_worker.iter().sum(),
            per_worker,
            claims,
            elapsed,
        };
        info!("[{}] {}", Phase::Reported, report.fingerprint);
        Ok(report)
    }
}

/// Join every worker, even after one has panicked
fn join_all(handles: Vec<JoinHandle<u64>>) -> Result<Vec<u64>, HarnessError> {
    let mut hashes = Vec::with_capacity(handles.len());
    let mut failure = None;

    for (index, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(count) => hashes.push(count),
            Err(_) => {
                error!("worker {} panicked", index);
                failure.get_or_insert(HarnessError::WorkerPanicked(index));
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(hashes),
    }
}

/// Configure, prepare and run in one call
pub fn run<E: Engine>(config: Config) -> Result<Report, HarnessError> {
    Harness::<E>::new(config)?.prepare()?.run()
}
