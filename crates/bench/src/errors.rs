// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anonset_aggregator::AggregationError;
use anonset_fhe::BackendError;
use anonset_fhe_params::ParameterError;
use thiserror::Error;

/// Errors that stop a whole benchmark run.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("{0}")]
    DependencyUnavailable(BackendError),

    #[error("At least one trial per size is required")]
    NoTrials,

    #[error("Could not build trial pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a size or a single trial produced no metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureReason {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("Decrypted aggregate {actual} does not match the plaintext sum {expected}")]
    WrongAggregate { expected: u64, actual: u64 },
}
