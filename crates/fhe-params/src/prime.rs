// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::constants::plaintext::{CONGRUENCE, MAX_BITS, MIN_BITS};
use crate::errors::{ParameterError, ParameterResult};
use crate::utils::bit_length;
use fhe_math::zq::primes::{generate_prime, is_prime};

/// Bit length the plaintext modulus needs so that every value up to
/// `required_sum` is represented without wraparound.
///
/// Depends on `required_sum` only, so it never decreases as the sum grows.
pub fn plaintext_bits_for(required_sum: u64) -> usize {
    (bit_length(required_sum) + 1).max(MIN_BITS)
}

/// Select the plaintext modulus for a required maximum sum.
///
/// Returns the largest prime t ≡ 1 mod [`CONGRUENCE`] with exactly
/// [`plaintext_bits_for`] bits, or the same search at the next bit lengths when
/// a bit length holds no such prime. Any t with that many bits is strictly
/// greater than `required_sum`.
pub fn select_plaintext_modulus(required_sum: u64) -> ParameterResult<u64> {
    let start = plaintext_bits_for(required_sum);
    if start > MAX_BITS {
        return Err(ParameterError::invalid_modulus(format!(
            "a sum of {required_sum} needs a {start}-bit plaintext modulus (max {MAX_BITS})"
        )));
    }

    for bits in start..=MAX_BITS {
        let upper_bound = u64::MAX >> (64 - bits);
        if let Some(t) = generate_prime(bits, CONGRUENCE, upper_bound) {
            return Ok(t);
        }
    }

    Err(ParameterError::invalid_modulus(format!(
        "no prime ≡ 1 mod {CONGRUENCE} between {start} and {MAX_BITS} bits"
    )))
}

/// Generate `sizes.len()` distinct NTT-friendly primes for `degree`, largest
/// first within each size.
pub fn coefficient_chain(degree: usize, sizes: &[usize]) -> ParameterResult<Vec<u64>> {
    let mut moduli: Vec<u64> = Vec::with_capacity(sizes.len());
    for size in sizes {
        if !(10..=62).contains(size) {
            return Err(ParameterError::invalid_modulus(format!(
                "ciphertext modulus size {size} is outside 10..=62 bits"
            )));
        }

        let mut upper_bound = 1u64 << size;
        loop {
            match generate_prime(*size, 2 * degree as u64, upper_bound) {
                Some(prime) if !moduli.contains(&prime) => {
                    moduli.push(prime);
                    break;
                }
                Some(prime) => upper_bound = prime,
                None => {
                    return Err(ParameterError::invalid_modulus(format!(
                        "not enough {size}-bit primes for degree {degree}"
                    )))
                }
            }
        }
    }
    Ok(moduli)
}

/// Check that `modulus` is a prime usable for batching at `degree`.
pub fn validate_ntt_prime(modulus: u64, degree: usize, what: &str) -> ParameterResult<()> {
    if modulus < 2 || !is_prime(modulus) {
        return Err(ParameterError::invalid_modulus(format!(
            "{what} {modulus} is not prime"
        )));
    }
    if modulus % (2 * degree as u64) != 1 {
        return Err(ParameterError::invalid_modulus(format!(
            "{what} {modulus} is not ≡ 1 mod {}",
            2 * degree
        )));
    }
    if bit_length(modulus) > 62 {
        return Err(ParameterError::invalid_modulus(format!(
            "{what} {modulus} is wider than 62 bits"
        )));
    }
    Ok(())
}
