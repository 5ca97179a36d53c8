// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod errors;
mod generator;
mod harness;
mod metrics;
mod pool;
mod report;
mod sink;

pub use errors::*;
pub use generator::*;
pub use harness::*;
pub use metrics::*;
pub use pool::*;
pub use report::*;
pub use sink::*;
