// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for parameter derivation

use thiserror::Error;

/// Errors raised while deriving or validating a [`crate::ParameterProfile`].
///
/// A parameter error is fatal for the anonymity-set size it was raised for and
/// nothing else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// No rung of the degree ladder can hold the anonymity set
    #[error("Unsupported anonymity-set size {size}: {reason}")]
    UnsupportedSize { size: i64, reason: String },

    /// A modulus is missing, not prime, not NTT-friendly or out of range
    #[error("Invalid modulus: {reason}")]
    InvalidModulus { reason: String },
}

/// Result type alias for parameter operations
pub type ParameterResult<T> = Result<T, ParameterError>;

impl ParameterError {
    pub fn unsupported_size(size: impl TryInto<i64>, reason: impl Into<String>) -> Self {
        ParameterError::UnsupportedSize {
            size: size.try_into().unwrap_or(i64::MAX),
            reason: reason.into(),
        }
    }

    pub fn invalid_modulus(reason: impl Into<String>) -> Self {
        ParameterError::InvalidModulus {
            reason: reason.into(),
        }
    }
}
