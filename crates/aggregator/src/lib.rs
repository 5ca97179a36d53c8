// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod errors;
mod pipeline;
mod timings;

pub use errors::AggregationError;
pub use pipeline::{AggregateOutcome, AggregationPipeline};
pub use timings::{timed, StageTimings};
