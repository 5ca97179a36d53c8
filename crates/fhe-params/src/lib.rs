// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Parameter profiles for BFV secure aggregation.

pub mod constants;
pub mod errors;
pub mod noise;
pub mod prime;
pub mod profile;
mod utils;

pub use errors::{ParameterError, ParameterResult};
pub use noise::NoiseEstimate;
pub use prime::{coefficient_chain, select_plaintext_modulus};
pub use profile::ParameterProfile;
