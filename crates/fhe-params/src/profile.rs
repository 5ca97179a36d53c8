// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::constants::{LadderRung, LADDER, MIN_DEGREE};
use crate::errors::{ParameterError, ParameterResult};
use crate::noise::NoiseEstimate;
use crate::prime::{select_plaintext_modulus, validate_ntt_prime};
use tracing::debug;

/// A complete BFV parameter set sized for one anonymity set.
///
/// Profiles are immutable once created. They carry everything needed to build
/// the scheme parameters plus the sizing they were derived for, so the
/// aggregation pipeline can tell when a sum would exceed what they guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterProfile {
    /// Polynomial degree d, a power of two ≥ 4096
    ///
    /// With a batching-friendly plaintext modulus this is also the number of
    /// SIMD slots.
    degree: usize,
    /// Ciphertext moduli q_i, NTT-friendly primes for `degree`
    moduli: Vec<u64>,
    /// Plaintext modulus t, prime and ≡ 1 mod 2d
    plaintext_modulus: u64,
    /// Largest value a single contribution may take
    max_value: u64,
    /// Number of contributions the profile was sized for
    capacity: usize,
}

impl ParameterProfile {
    /// Derive the smallest profile from the degree ladder that holds
    /// `anonymity_set_size` contributions of at most `max_value` each.
    pub fn derive(anonymity_set_size: usize, max_value: u64) -> ParameterResult<Self> {
        if anonymity_set_size == 0 {
            return Err(ParameterError::unsupported_size(
                0,
                "an anonymity set needs at least one contributor",
            ));
        }

        let required_sum = (anonymity_set_size as u64)
            .checked_mul(max_value)
            .ok_or_else(|| {
                ParameterError::unsupported_size(
                    anonymity_set_size,
                    format!("the maximum sum overflows u64 for max_value {max_value}"),
                )
            })?;

        let plaintext_modulus = select_plaintext_modulus(required_sum).map_err(|err| {
            ParameterError::unsupported_size(anonymity_set_size, err.to_string())
        })?;

        for rung in LADDER.iter() {
            if let Some(reason) = rejects(rung, anonymity_set_size, plaintext_modulus) {
                debug!(
                    degree = rung.degree,
                    size = anonymity_set_size,
                    "Skipping rung: {reason}"
                );
                continue;
            }

            let profile = ParameterProfile {
                degree: rung.degree,
                moduli: rung.moduli.to_vec(),
                plaintext_modulus,
                max_value,
                capacity: anonymity_set_size,
            };
            debug!(
                degree = profile.degree,
                plaintext_modulus,
                size = anonymity_set_size,
                budget_bits = profile.noise_budget_bits(anonymity_set_size),
                "Derived parameter profile"
            );
            return Ok(profile);
        }

        Err(ParameterError::unsupported_size(
            anonymity_set_size,
            format!(
                "no degree up to {} offers enough slots, a plaintext modulus above \
                 {required_sum} and a non-negative noise budget",
                LADDER[LADDER.len() - 1].degree
            ),
        ))
    }

    /// Build a profile from explicit values, validating every invariant
    /// [`ParameterProfile::derive`] guarantees.
    pub fn custom(
        degree: usize,
        moduli: Vec<u64>,
        plaintext_modulus: u64,
        max_value: u64,
        capacity: usize,
    ) -> ParameterResult<Self> {
        if degree < MIN_DEGREE || !degree.is_power_of_two() {
            return Err(ParameterError::invalid_modulus(format!(
                "polynomial degree {degree} must be a power of two ≥ {MIN_DEGREE}"
            )));
        }
        if moduli.is_empty() {
            return Err(ParameterError::invalid_modulus(
                "the ciphertext modulus chain is empty",
            ));
        }
        for (i, q) in moduli.iter().enumerate() {
            validate_ntt_prime(*q, degree, "ciphertext modulus")?;
            if moduli[..i].contains(q) {
                return Err(ParameterError::invalid_modulus(format!(
                    "ciphertext modulus {q} appears twice"
                )));
            }
        }
        validate_ntt_prime(plaintext_modulus, degree, "plaintext modulus")?;
        if moduli.iter().any(|q| *q <= plaintext_modulus) {
            return Err(ParameterError::invalid_modulus(format!(
                "plaintext modulus {plaintext_modulus} must be below every ciphertext modulus"
            )));
        }

        let profile = ParameterProfile {
            degree,
            moduli,
            plaintext_modulus,
            max_value,
            capacity,
        };

        if capacity == 0 || capacity > degree {
            return Err(ParameterError::unsupported_size(
                capacity,
                format!("capacity must be between 1 and the {degree} available slots"),
            ));
        }
        if !profile.can_represent_sum_of(capacity) {
            return Err(ParameterError::unsupported_size(
                capacity,
                format!(
                    "{capacity} contributions of up to {max_value} overflow plaintext \
                     modulus {plaintext_modulus}"
                ),
            ));
        }
        if profile.noise_budget_bits(capacity) < 0.0 {
            return Err(ParameterError::unsupported_size(
                capacity,
                "the noise budget is exhausted before reaching capacity",
            ));
        }

        Ok(profile)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of SIMD slots in a batched plaintext.
    pub fn slot_count(&self) -> usize {
        self.degree
    }

    pub fn moduli(&self) -> &[u64] {
        &self.moduli
    }

    pub fn plaintext_modulus(&self) -> u64 {
        self.plaintext_modulus
    }

    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// Anonymity-set size the profile was sized for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn noise(&self) -> NoiseEstimate {
        NoiseEstimate::new(self.degree, &self.moduli, self.plaintext_modulus)
    }

    /// Predicted noise budget, in bits, of a sum of `count` fresh ciphertexts.
    pub fn noise_budget_bits(&self, count: usize) -> f64 {
        self.noise().budget_bits(count)
    }

    /// Whether `count` contributions of at most `max_value` sum to less than
    /// the plaintext modulus.
    pub fn can_represent_sum_of(&self, count: usize) -> bool {
        (count as u64)
            .checked_mul(self.max_value)
            .is_some_and(|sum| sum < self.plaintext_modulus)
    }
}

fn rejects(rung: &LadderRung, size: usize, plaintext_modulus: u64) -> Option<String> {
    if rung.degree < size {
        return Some(format!("{} slots < {size} contributors", rung.degree));
    }
    if rung.moduli.iter().any(|q| *q <= plaintext_modulus) {
        return Some(format!(
            "plaintext modulus {plaintext_modulus} does not fit under the ciphertext moduli"
        ));
    }
    let budget = NoiseEstimate::new(rung.degree, rung.moduli, plaintext_modulus).budget_bits(size);
    if budget < 0.0 {
        return Some(format!("noise budget {budget:.2} bits"));
    }
    None
}
