// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, str::FromStr};
use tracing::Level;

pub const DEFAULT_CONFIG_NAME: &str = "anonset.config.yaml";
pub const ENV_PREFIX: &str = "ANONSET_";

/// How contribution values are drawn for each trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueDistribution {
    /// Uniform over `0..=max_value`
    #[default]
    Uniform,
    /// Half ones, half zeros, shuffled
    Votes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Sweep points. Non-positive sizes are recorded as failures.
    pub anonymity_set_sizes: Vec<i64>,
    pub trials_per_size: usize,
    /// Largest value a single contribution may take
    pub max_value: u64,
    pub value_distribution: ValueDistribution,
    /// Seed for every trial RNG. Drawn from the OS when unset.
    pub seed: Option<u64>,
    /// Worker threads running the trials of one size
    pub threads: usize,
    pub log_level: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            anonymity_set_sizes: vec![8, 16, 32, 64],
            trials_per_size: 5,
            max_value: 1000,
            value_distribution: ValueDistribution::Uniform,
            seed: None,
            threads: 1,
            log_level: "info".to_string(),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials_per_size == 0 {
            bail!("trials_per_size must be at least 1");
        }
        if self.threads == 0 {
            bail!("threads must be at least 1");
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level> {
        Level::from_str(&self.log_level)
            .with_context(|| format!("Invalid log_level '{}'", self.log_level))
    }
}

/// Load the configuration layering defaults, the YAML file and `ANONSET_*`
/// environment variables, in that order.
///
/// Without an explicit `config_file` the nearest `anonset.config.yaml` at or
/// above the working directory is used, if any.
pub fn load_config(config_file: Option<PathBuf>) -> Result<BenchConfig> {
    let resolved = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        DEFAULT_CONFIG_NAME,
        config_file,
    );

    let mut figment = Figment::from(Serialized::defaults(BenchConfig::default()));
    if let Some(path) = resolved {
        let yaml = fs::read_to_string(&path)
            .with_context(|| format!("Configuration file not found: {}", path.display()))?;
        figment = figment.merge(Yaml::string(&yaml));
    }

    let config: BenchConfig = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("Could not parse configuration")?;

    config.validate()?;
    Ok(config)
}
