//! Monte Carlo uncertainty propagation driver.
//!
//! Repeatedly samples a randomized realization of the telescope, evaluates
//! the resolution oracle on it, and accumulates the outcomes. Iterations are
//! statistically independent; the sequential path threads one generator
//! through all iterations, the parallel path derives one private generator
//! stream per iteration from the master seed so results do not depend on
//! worker scheduling.

use tracing::{debug, info};

use crate::engine::rng::SimRng;
use crate::error::{TelError, TelResult};
use crate::model::TelescopeConfiguration;
use crate::oracle::ResolutionOracle;
use crate::sampler::GeometrySampler;
use crate::stats::distribution::OutcomeDistribution;

/// Historical iteration count of the reference estimator.
///
/// Large enough for a stable Gaussian fit; kept as the default but
/// configurable.
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Driver for Monte Carlo error propagation.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloDriver {
    iterations: usize,
}

impl Default for MonteCarloDriver {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl MonteCarloDriver {
    /// Create a driver with an explicit iteration count.
    #[must_use]
    pub const fn with_iterations(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Configured iteration count.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run all iterations on the calling thread.
    ///
    /// # Errors
    ///
    /// Aborts on the first oracle failure, returning `RunAborted` with the
    /// iteration index and the offending realization attached; a sampling
    /// failure (a draw violating plane invariants) propagates as
    /// `InvalidPlane`. No iteration is silently skipped.
    pub fn run<O: ResolutionOracle>(
        &self,
        config: &TelescopeConfiguration,
        oracle: &O,
        rng: &mut SimRng,
    ) -> TelResult<OutcomeDistribution> {
        let sampler = GeometrySampler::new();
        let mut dist = OutcomeDistribution::with_capacity(self.iterations);

        info!(
            iterations = self.iterations,
            seed = rng.master_seed(),
            "starting Monte Carlo run"
        );

        for iteration in 0..self.iterations {
            let realization = sampler.sample(config, rng)?;
            let resolution = oracle
                .resolution(
                    &realization.planes,
                    realization.beam_energy,
                    config.target_plane(),
                )
                .map_err(|err| TelError::RunAborted {
                    iteration,
                    reason: err.to_string(),
                    beam: realization.beam_energy,
                    planes: realization.planes.len(),
                    realization: Box::new(realization.clone()),
                })?;
            debug!(iteration, resolution, "iteration complete");
            dist.push(resolution);
        }

        Ok(dist)
    }

    /// Run all iterations across a work-stealing worker pool.
    ///
    /// Each iteration owns a private generator stream derived from
    /// `master_seed`, so the outcome at index `i` is identical no matter
    /// which worker executed it or in what order; partial results merge by
    /// concatenation in index order. Note that the stream layout differs
    /// from [`Self::run`], so sequential and parallel runs of the same seed
    /// are each internally reproducible but not equal to one another.
    ///
    /// # Errors
    ///
    /// As for [`Self::run`]; with several failing iterations the one with
    /// the smallest index is reported, deterministically.
    pub fn run_parallel<O>(
        &self,
        config: &TelescopeConfiguration,
        oracle: &O,
        master_seed: u64,
        workers: usize,
    ) -> TelResult<OutcomeDistribution>
    where
        O: ResolutionOracle + Sync,
    {
        use crossbeam_deque::{Injector, Stealer, Worker};

        let workers = workers.max(1);
        info!(
            iterations = self.iterations,
            seed = master_seed,
            workers,
            "starting parallel Monte Carlo run"
        );

        let injector: Injector<usize> = Injector::new();
        let local_queues: Vec<Worker<usize>> =
            (0..workers).map(|_| Worker::new_fifo()).collect();
        let stealers: Vec<Stealer<usize>> =
            local_queues.iter().map(Worker::stealer).collect();

        for index in 0..self.iterations {
            injector.push(index);
        }

        let results: std::sync::Mutex<Vec<(usize, TelResult<f64>)>> =
            std::sync::Mutex::new(Vec::with_capacity(self.iterations));

        std::thread::scope(|s| {
            for (worker_id, local) in local_queues.into_iter().enumerate() {
                let injector = &injector;
                let stealers = &stealers;
                let results = &results;

                s.spawn(move || {
                    let sampler = GeometrySampler::new();
                    loop {
                        let task = local
                            .pop()
                            .or_else(|| {
                                loop {
                                    match injector.steal() {
                                        crossbeam_deque::Steal::Success(t) => return Some(t),
                                        crossbeam_deque::Steal::Empty => break,
                                        crossbeam_deque::Steal::Retry => {}
                                    }
                                }
                                None
                            })
                            .or_else(|| {
                                for i in 0..stealers.len() {
                                    let idx = (worker_id + i + 1) % stealers.len();
                                    loop {
                                        match stealers[idx].steal() {
                                            crossbeam_deque::Steal::Success(t) => {
                                                return Some(t)
                                            }
                                            crossbeam_deque::Steal::Empty => break,
                                            crossbeam_deque::Steal::Retry => {}
                                        }
                                    }
                                }
                                None
                            });

                        let Some(iteration) = task else { break };

                        let mut rng = SimRng::for_stream(master_seed, iteration as u64);
                        let outcome = sampler.sample(config, &mut rng).and_then(|r| {
                            oracle
                                .resolution(&r.planes, r.beam_energy, config.target_plane())
                                .map_err(|err| TelError::RunAborted {
                                    iteration,
                                    reason: err.to_string(),
                                    beam: r.beam_energy,
                                    planes: r.planes.len(),
                                    realization: Box::new(r.clone()),
                                })
                        });

                        if let Ok(mut guard) = results.lock() {
                            guard.push((iteration, outcome));
                        }
                    }
                });
            }
        });

        let mut indexed = results.into_inner().unwrap_or_default();
        indexed.sort_by_key(|(idx, _)| *idx);

        let mut dist = OutcomeDistribution::with_capacity(self.iterations);
        for (_, outcome) in indexed {
            dist.push(outcome?);
        }
        Ok(dist)
    }
}
