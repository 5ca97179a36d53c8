// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::errors::AggregationError;
use crate::timings::{timed, StageTimings};
use anonset_fhe::{EncodingError, HomomorphicBackend, KeyMaterial, SlotEncoder};
use rand::{CryptoRng, RngCore};
use tracing::{debug, trace};

/// Result of one aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    /// Decrypted slot 0 of the summed ciphertext
    pub value: u64,
    pub timings: StageTimings,
    /// Predicted noise budget left in the aggregate
    pub noise_budget_bits: f64,
}

/// Encrypts each contribution on its own, sums the ciphertexts and decrypts
/// the total.
pub struct AggregationPipeline<'a, B: HomomorphicBackend> {
    backend: &'a B,
}

impl<'a, B: HomomorphicBackend> AggregationPipeline<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Refuse sums the profile cannot decrypt correctly. Returns the
    /// predicted noise budget of a sum of `count` fresh ciphertexts.
    pub fn check_capacity(&self, count: usize) -> Result<f64, AggregationError> {
        if count == 0 {
            return Err(AggregationError::NoContributions);
        }

        let profile = self.backend.profile();
        if !profile.can_represent_sum_of(count) {
            return Err(AggregationError::PlaintextOverflow {
                contributions: count,
                max_value: profile.max_value(),
                modulus: profile.plaintext_modulus(),
            });
        }

        let budget_bits = profile.noise_budget_bits(count);
        if budget_bits < 0.0 {
            return Err(AggregationError::NoiseBudgetExhausted {
                contributions: count,
                budget_bits,
            });
        }
        Ok(budget_bits)
    }

    /// Range-check, encode into slot 0 and encrypt every contribution.
    pub fn encrypt_contributions<R: RngCore + CryptoRng>(
        &self,
        contributions: &[u64],
        keys: &KeyMaterial<'_, B>,
        encoder: &SlotEncoder<'_, B>,
        rng: &mut R,
    ) -> Result<Vec<B::Ciphertext>, AggregationError> {
        let max_value = self.backend.profile().max_value();
        contributions
            .iter()
            .map(|&value| -> Result<B::Ciphertext, AggregationError> {
                if value > max_value {
                    return Err(EncodingError::ExceedsMaxValue { value, max_value }.into());
                }
                let plaintext = encoder.encode_single(value)?;
                Ok(keys.encrypt(&plaintext, rng)?)
            })
            .collect()
    }

    /// Left fold of homomorphic additions. Each step produces a new
    /// ciphertext; the inputs are left as they were.
    pub fn accumulate(
        &self,
        ciphertexts: &[B::Ciphertext],
    ) -> Result<B::Ciphertext, AggregationError> {
        let (first, rest) = ciphertexts
            .split_first()
            .ok_or(AggregationError::NoContributions)?;

        rest.iter()
            .try_fold(first.clone(), |acc, ct| -> Result<_, AggregationError> {
                Ok(self.backend.add(&acc, ct)?)
            })
    }

    pub fn aggregate<R: RngCore + CryptoRng>(
        &self,
        contributions: &[u64],
        keys: &KeyMaterial<'_, B>,
        encoder: &SlotEncoder<'_, B>,
        rng: &mut R,
    ) -> Result<AggregateOutcome, AggregationError> {
        let count = contributions.len();
        let noise_budget_bits = self.check_capacity(count)?;

        let (ciphertexts, encrypt) =
            timed(|| self.encrypt_contributions(contributions, keys, encoder, rng));
        let ciphertexts = ciphertexts?;
        trace!(count, "Encrypted contributions");

        let (total, aggregate) = timed(|| self.accumulate(&ciphertexts));
        let total = total?;

        let (decoded, decrypt) = timed(|| -> Result<Vec<u64>, AggregationError> {
            let plaintext = keys.decrypt(&total)?;
            Ok(encoder.decode(&plaintext)?)
        });
        let value = decoded?.first().copied().unwrap_or_default();

        let timings = StageTimings::new(encrypt, aggregate, decrypt);
        debug!(
            count,
            value,
            total_ms = timings.total_ms,
            budget_bits = noise_budget_bits,
            "Aggregated contributions"
        );

        Ok(AggregateOutcome {
            value,
            timings,
            noise_budget_bits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anonset_fhe::ParameterProfile;
    use anonset_test_helpers::{create_rng_from_u64, MockBackend};

    fn backend(size: usize, max_value: u64) -> MockBackend {
        MockBackend::new(ParameterProfile::derive(size, max_value).unwrap())
    }

    #[test]
    fn accumulate_folds_every_ciphertext() {
        let backend = backend(4, 10);
        let pipeline = AggregationPipeline::new(&backend);
        let encoder = SlotEncoder::new(&backend);
        let mut rng = create_rng_from_u64(1);
        let keys = KeyMaterial::generate(&backend, &mut rng).unwrap();

        let cts = pipeline
            .encrypt_contributions(&[1, 2, 3, 4], &keys, &encoder, &mut rng)
            .unwrap();
        let total = pipeline.accumulate(&cts).unwrap();

        assert_eq!(total.fresh_count, 4);
        assert_eq!(total.slots[0], 10);
        assert!(total.slots[1..].iter().all(|v| *v == 0));
        // operands are untouched
        assert_eq!(cts[0].slots[0], 1);
        assert_eq!(cts[0].fresh_count, 1);
    }

    #[test]
    fn empty_input_is_rejected() {
        let backend = backend(4, 10);
        let pipeline = AggregationPipeline::new(&backend);
        let encoder = SlotEncoder::new(&backend);
        let mut rng = create_rng_from_u64(2);
        let keys = KeyMaterial::generate(&backend, &mut rng).unwrap();

        assert_eq!(
            pipeline.aggregate(&[], &keys, &encoder, &mut rng),
            Err(AggregationError::NoContributions)
        );
        assert_eq!(
            pipeline.accumulate(&[]).err(),
            Some(AggregationError::NoContributions)
        );
    }

    #[test]
    fn values_above_the_profile_maximum_are_rejected() {
        let backend = backend(4, 10);
        let pipeline = AggregationPipeline::new(&backend);
        let encoder = SlotEncoder::new(&backend);
        let mut rng = create_rng_from_u64(3);
        let keys = KeyMaterial::generate(&backend, &mut rng).unwrap();

        let err = pipeline
            .aggregate(&[1, 11], &keys, &encoder, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            AggregationError::Encoding(EncodingError::ExceedsMaxValue {
                value: 11,
                max_value: 10
            })
        );
    }

    #[test]
    fn overflowing_sums_are_refused() {
        // 65537 holds 6 * 10000 but not 7 * 10000
        let backend = backend(6, 10_000);
        assert_eq!(backend.plaintext_modulus(), 65537);
        let pipeline = AggregationPipeline::new(&backend);
        let encoder = SlotEncoder::new(&backend);
        let mut rng = create_rng_from_u64(4);
        let keys = KeyMaterial::generate(&backend, &mut rng).unwrap();

        let ok = pipeline
            .aggregate(&[10_000; 6], &keys, &encoder, &mut rng)
            .unwrap();
        assert_eq!(ok.value, 60_000);

        let err = pipeline
            .aggregate(&[10_000; 7], &keys, &encoder, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            AggregationError::PlaintextOverflow {
                contributions: 7,
                max_value: 10_000,
                modulus: 65537
            }
        );
    }

    #[test]
    fn outcome_reports_stage_timings() {
        let backend = backend(3, 9);
        let pipeline = AggregationPipeline::new(&backend);
        let encoder = SlotEncoder::new(&backend);
        let mut rng = create_rng_from_u64(5);
        let keys = KeyMaterial::generate(&backend, &mut rng).unwrap();

        let outcome = pipeline
            .aggregate(&[5, 7, 9], &keys, &encoder, &mut rng)
            .unwrap();
        assert_eq!(outcome.value, 21);
        let t = outcome.timings;
        assert_eq!(t.total_ms, t.encrypt_ms + t.aggregate_ms + t.decrypt_ms);
        assert!(outcome.noise_budget_bits > 0.0);
    }
}
