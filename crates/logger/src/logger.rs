// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Install a global fmt subscriber capped at `log_level`. Logs go to stderr
/// so stdout stays free for machine readable output.
pub fn setup_simple_tracing(log_level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(LevelFilter::from_level(log_level))
        .try_init()
        .map_err(|e| anyhow!("Could not install tracing subscriber: {e}"))
}
