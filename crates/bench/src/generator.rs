// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anonset_config::ValueDistribution;
use rand::{seq::SliceRandom, Rng, RngCore};

/// Draws the contributions of one trial.
pub trait ValueGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Largest value this generator produces when configured with
    /// `max_value`. Profiles are sized for it.
    fn value_bound(&self, max_value: u64) -> u64 {
        max_value
    }

    fn generate(&self, count: usize, max_value: u64, rng: &mut dyn RngCore) -> Vec<u64>;
}

/// Values drawn uniformly from `0..=max_value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformValues;

impl ValueGenerator for UniformValues {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn generate(&self, count: usize, max_value: u64, rng: &mut dyn RngCore) -> Vec<u64> {
        (0..count).map(|_| rng.gen_range(0..=max_value)).collect()
    }
}

/// Mock ballot: ⌊n/2⌋ ones and the rest zeros, shuffled.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryVotes;

impl ValueGenerator for BinaryVotes {
    fn name(&self) -> &'static str {
        "votes"
    }

    fn value_bound(&self, max_value: u64) -> u64 {
        max_value.min(1)
    }

    fn generate(&self, count: usize, _max_value: u64, rng: &mut dyn RngCore) -> Vec<u64> {
        let mut votes: Vec<u64> = (0..count).map(|i| u64::from(i < count / 2)).collect();
        votes.shuffle(rng);
        votes
    }
}

pub fn generator_for(distribution: ValueDistribution) -> Box<dyn ValueGenerator> {
    match distribution {
        ValueDistribution::Uniform => Box::new(UniformValues),
        ValueDistribution::Votes => Box::new(BinaryVotes),
    }
}
