// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::errors::FailureReason;
use serde::{Deserialize, Serialize};

/// One benchmark sample. Serialized field order is part of the output
/// format consumed by chart tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub anonymity_set_size: usize,
    pub encrypt_ms: f64,
    pub aggregate_ms: f64,
    pub total_ms: f64,
    pub trial_index: usize,
}

/// A successful trial: the published metric plus what stays internal.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    pub metric: MetricRecord,
    pub decrypt_ms: f64,
    pub aggregate: u64,
    pub noise_budget_bits: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    /// Size as requested, which may be zero or negative
    pub anonymity_set_size: i64,
    /// `None` when the whole size failed before any trial ran
    pub trial_index: Option<usize>,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SweepRecord {
    Trial(TrialRecord),
    Failed(FailureRecord),
}

impl SweepRecord {
    pub fn anonymity_set_size(&self) -> i64 {
        match self {
            SweepRecord::Trial(t) => t.metric.anonymity_set_size as i64,
            SweepRecord::Failed(f) => f.anonymity_set_size,
        }
    }

    pub fn metric(&self) -> Option<&MetricRecord> {
        match self {
            SweepRecord::Trial(t) => Some(&t.metric),
            SweepRecord::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureRecord> {
        match self {
            SweepRecord::Failed(f) => Some(f),
            SweepRecord::Trial(_) => None,
        }
    }
}
