// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Worst-case noise analysis for summing fresh BFV ciphertexts.
//!
//! A public-key encryption c = (Δm + p0·u + e1, p1·u + e2) decrypts to
//! Δm − e·u + e1 + e2·s. The errors and u come from a CBD bounded by B and
//! B_U, the secret s is ternary, so its noise is bounded by
//!
//! ```text
//! B_fresh = B + d·B·B_U + d·B·B_χ
//! ```
//!
//! Summing k of them yields at most `B_C(k) = k·(B_fresh + r_t(q))` where
//! `r_t(q) = q mod t`. Decryption is correct while `2·B_C(k) < Δ = ⌊q/t⌋`.

use crate::constants::noise::{B, B_CHI, B_U};
use crate::utils::{log2_big, product};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

#[derive(Debug, Clone)]
pub struct NoiseEstimate {
    /// Bound on the noise of one fresh ciphertext
    pub b_fresh: BigUint,
    /// q mod t
    pub rtq: BigUint,
    /// ⌊q/t⌋
    pub delta: BigUint,
    /// log2(Δ)
    pub delta_log2: f64,
}

impl NoiseEstimate {
    pub fn new(degree: usize, moduli: &[u64], plaintext_modulus: u64) -> Self {
        let q = product(moduli);
        let t = BigUint::from(plaintext_modulus);
        let delta = &q / &t;
        let rtq = &q % &t;

        let b = BigUint::from(B);
        let d_b = BigUint::from(degree) * &b;
        let b_fresh = &b + &d_b * B_U + &d_b * B_CHI;

        NoiseEstimate {
            delta_log2: log2_big(&delta),
            b_fresh,
            rtq,
            delta,
        }
    }

    /// Noise bound after summing `count` fresh ciphertexts.
    pub fn accumulated_bound(&self, count: usize) -> BigUint {
        BigUint::from(count.max(1)) * (&self.b_fresh + &self.rtq)
    }

    /// Remaining budget in bits after summing `count` fresh ciphertexts.
    ///
    /// Negative once `2·B_C(count) ≥ Δ`, at which point decryption is no
    /// longer guaranteed to be correct.
    pub fn budget_bits(&self, count: usize) -> f64 {
        let lhs = self.accumulated_bound(count) << 1;
        if lhs >= self.delta {
            // report the overshoot, and never a positive number at the boundary
            return (self.delta_log2 - log2_big(&lhs)).min(-f64::EPSILON);
        }
        (self.delta_log2 - log2_big(&lhs)).max(0.0)
    }

    /// Largest number of fresh ciphertexts that can be summed with a
    /// non-negative budget.
    pub fn max_additions(&self) -> usize {
        let per_ciphertext = &self.b_fresh + &self.rtq;
        // 2·k·per < Δ  ⇔  k ≤ (Δ − 1) / (2·per)
        let two_per = per_ciphertext << 1;
        if self.delta <= two_per {
            return 0;
        }
        ((&self.delta - 1u32) / two_per)
            .to_usize()
            .unwrap_or(usize::MAX)
    }
}
