// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::errors::{BenchError, FailureReason};
use crate::generator::ValueGenerator;
use crate::metrics::{FailureRecord, MetricRecord, SweepRecord, TrialRecord};
use crate::pool::TrialPool;
use crate::report::BenchmarkRun;
use anonset_aggregator::AggregationPipeline;
use anonset_config::BenchConfig;
use anonset_fhe::{HomomorphicBackend, KeyMaterial, SlotEncoder};
use anonset_fhe_params::{ParameterError, ParameterProfile};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::marker::PhantomData;
use tracing::{debug, error, info, warn};

/// Sweeps anonymity-set sizes, timing independent aggregation trials at
/// each one.
pub struct BenchmarkHarness<B: HomomorphicBackend> {
    pool: TrialPool,
    max_value: u64,
    seed: u64,
    _backend: PhantomData<fn() -> B>,
}

impl<B: HomomorphicBackend> BenchmarkHarness<B> {
    /// A `None` seed is drawn from the thread RNG and logged so the run can
    /// be repeated.
    pub fn new(max_value: u64, seed: Option<u64>, threads: usize) -> Result<Self, BenchError> {
        let seed = seed.unwrap_or_else(rand::random);
        let pool = TrialPool::new(threads)?;
        info!(
            backend = B::NAME,
            seed,
            threads = pool.threads(),
            "Benchmark harness ready"
        );
        Ok(Self {
            pool,
            max_value,
            seed,
            _backend: PhantomData,
        })
    }

    pub fn from_config(config: &BenchConfig) -> Result<Self, BenchError> {
        Self::new(config.max_value, config.seed, config.threads)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run `trials_per_size` trials at every size in `sizes`.
    ///
    /// Only an unusable backend or a zero trial count aborts the run. Sizes
    /// and trials that fail leave a [`SweepRecord::Failed`] marker and the
    /// sweep moves on.
    pub fn run<G: ValueGenerator + ?Sized>(
        &self,
        sizes: &[i64],
        trials_per_size: usize,
        generator: &G,
    ) -> Result<BenchmarkRun, BenchError> {
        if trials_per_size == 0 {
            return Err(BenchError::NoTrials);
        }
        B::probe().map_err(|e| {
            error!(backend = B::NAME, "{e}");
            BenchError::DependencyUnavailable(e)
        })?;

        let mut run = BenchmarkRun::new();
        for &size in sizes {
            info!(size, trials = trials_per_size, generator = generator.name(), "Benchmarking");
            run.extend(self.run_size(size, trials_per_size, generator));
        }

        let summary = run.summary();
        info!(
            succeeded = ?summary.succeeded,
            partial = ?summary.partial,
            failed = ?summary.failed,
            "{summary}"
        );
        Ok(run)
    }

    fn run_size<G: ValueGenerator + ?Sized>(
        &self,
        size: i64,
        trials: usize,
        generator: &G,
    ) -> Vec<SweepRecord> {
        let backend = match self.setup(size, generator) {
            Ok(backend) => backend,
            Err(err) => {
                warn!(size, "Skipping size: {err}");
                return vec![SweepRecord::Failed(FailureRecord {
                    anonymity_set_size: size,
                    trial_index: None,
                    reason: err.into(),
                })];
            }
        };
        let n = backend.profile().capacity();

        self.pool
            .run_all(&format!("size-{n}"), trials, |trial| {
                self.run_trial(&backend, n, trial, generator)
            })
            .into_iter()
            .enumerate()
            .map(|(trial, result)| match result {
                Ok(record) => SweepRecord::Trial(record),
                Err(reason) => {
                    warn!(size, trial, "Trial failed: {reason}");
                    SweepRecord::Failed(FailureRecord {
                        anonymity_set_size: size,
                        trial_index: Some(trial),
                        reason,
                    })
                }
            })
            .collect()
    }

    /// Derive the profile and build the backend context shared by every
    /// trial of `size`.
    fn setup<G: ValueGenerator + ?Sized>(
        &self,
        size: i64,
        generator: &G,
    ) -> Result<B, ParameterError> {
        let n = usize::try_from(size).map_err(|_| {
            ParameterError::unsupported_size(size, "anonymity-set size must be positive")
        })?;
        let profile = ParameterProfile::derive(n, generator.value_bound(self.max_value))?;
        debug!(
            size,
            degree = profile.degree(),
            plaintext_modulus = profile.plaintext_modulus(),
            "Using parameter profile"
        );
        B::from_profile(&profile)
    }

    /// The RNG of one trial depends on the seed, the size and the trial
    /// index only.
    fn trial_rng(&self, size: usize, trial: usize) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        rng.set_stream(((size as u64) << 32) | trial as u64);
        rng
    }

    fn run_trial<G: ValueGenerator + ?Sized>(
        &self,
        backend: &B,
        size: usize,
        trial: usize,
        generator: &G,
    ) -> Result<TrialRecord, FailureReason> {
        let mut rng = self.trial_rng(size, trial);

        let keys = KeyMaterial::generate(backend, &mut rng)?;
        let values = generator.generate(size, self.max_value, &mut rng);
        let encoder = SlotEncoder::new(backend);
        let outcome =
            AggregationPipeline::new(backend).aggregate(&values, &keys, &encoder, &mut rng)?;

        let expected = values.iter().sum::<u64>() % backend.plaintext_modulus();
        if outcome.value != expected {
            return Err(FailureReason::WrongAggregate {
                expected,
                actual: outcome.value,
            });
        }

        debug!(
            size,
            trial,
            aggregate = outcome.value,
            total_ms = outcome.timings.total_ms,
            "Trial complete"
        );

        Ok(TrialRecord {
            metric: MetricRecord {
                anonymity_set_size: size,
                encrypt_ms: outcome.timings.encrypt_ms,
                aggregate_ms: outcome.timings.aggregate_ms,
                total_ms: outcome.timings.total_ms,
                trial_index: trial,
            },
            decrypt_ms: outcome.timings.decrypt_ms,
            aggregate: outcome.value,
            noise_budget_bits: outcome.noise_budget_bits,
        })
    }
}
