// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anonset_bench::{generator_for, BenchmarkHarness};
use anonset_config::load_config;
use anonset_fhe::BfvBackend;
use anonset_logger::setup_simple_tracing;
use anyhow::Result;
use std::io;

fn main() -> Result<()> {
    let config = load_config(None)?;
    setup_simple_tracing(config.log_level()?)?;

    let harness = BenchmarkHarness::<BfvBackend>::from_config(&config)?;
    let generator = generator_for(config.value_distribution);
    let run = harness.run(
        &config.anonymity_set_sizes,
        config.trials_per_size,
        generator.as_ref(),
    )?;

    // stdout carries the records only, logs and the report go to stderr
    run.publish(io::stdout().lock(), io::stderr().lock())
}
