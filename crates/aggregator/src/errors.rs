// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anonset_fhe::{BackendError, EncodingError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// Decrypting the aggregate would not be guaranteed to return the true sum
    #[error("Noise budget exhausted at {contributions} contributions ({budget_bits:.2} bits)")]
    NoiseBudgetExhausted {
        contributions: usize,
        budget_bits: f64,
    },

    /// The sum may wrap around the plaintext modulus
    #[error("{contributions} values up to {max_value} may wrap plaintext modulus {modulus}")]
    PlaintextOverflow {
        contributions: usize,
        max_value: u64,
        modulus: u64,
    },

    #[error("Nothing to aggregate")]
    NoContributions,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
