// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod backend;
mod bfv;
mod encoder;
mod keys;

pub use backend::*;
pub use bfv::*;
pub use encoder::*;
pub use keys::*;

// Re-export params so dependents can use anonset_fhe::ParameterProfile without
// depending on anonset-fhe-params.
pub use anonset_fhe_params::{ParameterError, ParameterProfile};
