// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::metrics::{FailureRecord, MetricRecord, SweepRecord};
use crate::sink::{JsonLinesSink, ResultSink};
use anyhow::{Context, Result};
use std::fmt;
use std::io::Write;

/// Append-only output of a sweep, ordered by sweep position then trial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkRun {
    records: Vec<SweepRecord>,
}

impl BenchmarkRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, records: impl IntoIterator<Item = SweepRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricRecord> {
        self.records.iter().filter_map(SweepRecord::metric)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.records.iter().filter_map(SweepRecord::failure)
    }

    /// Sizes in sweep order, each listed once.
    fn sizes(&self) -> Vec<i64> {
        let mut sizes: Vec<i64> = Vec::new();
        for size in self.records.iter().map(SweepRecord::anonymity_set_size) {
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }
        sizes
    }

    pub fn summary(&self) -> SweepSummary {
        let mut summary = SweepSummary::default();
        for size in self.sizes() {
            let of_size = || {
                self.records
                    .iter()
                    .filter(move |r| r.anonymity_set_size() == size)
            };
            let ok = of_size().filter(|r| r.metric().is_some()).count();
            let failed = of_size().filter(|r| r.failure().is_some()).count();
            summary.trials_ok += ok;
            summary.trials_failed += failed;
            match (ok, failed) {
                (_, 0) => summary.succeeded.push(size),
                (0, _) => summary.failed.push(size),
                _ => summary.partial.push(size),
            }
        }
        summary
    }

    /// Mean timings per anonymity-set size, the grouping chart tooling uses.
    pub fn group_means(&self) -> Vec<SizeMeans> {
        let mut groups: Vec<SizeMeans> = Vec::new();
        for record in self.records.iter() {
            let SweepRecord::Trial(trial) = record else {
                continue;
            };
            let size = trial.metric.anonymity_set_size;
            let group = match groups.iter().position(|g| g.anonymity_set_size == size) {
                Some(i) => &mut groups[i],
                None => {
                    groups.push(SizeMeans::empty(size));
                    let last = groups.len() - 1;
                    &mut groups[last]
                }
            };
            group.runs += 1;
            group.encrypt_ms += trial.metric.encrypt_ms;
            group.aggregate_ms += trial.metric.aggregate_ms;
            group.decrypt_ms += trial.decrypt_ms;
            group.total_ms += trial.metric.total_ms;
        }

        for group in groups.iter_mut() {
            let runs = group.runs as f64;
            group.encrypt_ms /= runs;
            group.aggregate_ms /= runs;
            group.decrypt_ms /= runs;
            group.total_ms /= runs;
        }
        groups
    }

    pub fn write_to(&self, sink: &mut dyn ResultSink) -> Result<()> {
        for metric in self.metrics() {
            sink.write(metric)?;
        }
        Ok(())
    }

    /// Metric records go to `records` as JSON lines and nothing else does.
    /// The human readable report goes to `report`.
    pub fn publish<R: Write, E: Write>(&self, records: R, mut report: E) -> Result<()> {
        let mut sink = JsonLinesSink::new(records);
        self.write_to(&mut sink).context("Could not write metric records")?;
        sink.into_inner().flush()?;

        writeln!(report, "{}", self.report())?;
        Ok(())
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            means: self.group_means(),
            summary: self.summary(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Sizes where every trial produced a metric
    pub succeeded: Vec<i64>,
    /// Sizes where some trials failed
    pub partial: Vec<i64>,
    /// Sizes that produced no metric at all
    pub failed: Vec<i64>,
    pub trials_ok: usize,
    pub trials_failed: usize,
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sizes succeeded, {} partially failed, {} failed ({} trials ok, {} failed)",
            self.succeeded.len(),
            self.partial.len(),
            self.failed.len(),
            self.trials_ok,
            self.trials_failed
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeMeans {
    pub anonymity_set_size: usize,
    pub runs: usize,
    pub encrypt_ms: f64,
    pub aggregate_ms: f64,
    pub decrypt_ms: f64,
    pub total_ms: f64,
}

impl SizeMeans {
    fn empty(anonymity_set_size: usize) -> Self {
        Self {
            anonymity_set_size,
            runs: 0,
            encrypt_ms: 0.0,
            aggregate_ms: 0.0,
            decrypt_ms: 0.0,
            total_ms: 0.0,
        }
    }
}

pub struct RunReport {
    means: Vec<SizeMeans>,
    summary: SweepSummary,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>10} {:>6} {:>12} {:>12} {:>12} {:>12}",
            "Size", "Runs", "Encrypt ms", "Aggregate ms", "Decrypt ms", "Total ms"
        )?;
        writeln!(f, "{}", "-".repeat(69))?;

        for m in &self.means {
            writeln!(
                f,
                "{:>10} {:>6} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
                m.anonymity_set_size, m.runs, m.encrypt_ms, m.aggregate_ms, m.decrypt_ms, m.total_ms
            )?;
        }

        writeln!(f, "{}", "-".repeat(69))?;
        write!(f, "{}", self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureReason;
    use crate::metrics::TrialRecord;
    use anonset_fhe_params::ParameterError;

    fn trial(size: usize, trial_index: usize, total_ms: f64) -> SweepRecord {
        SweepRecord::Trial(TrialRecord {
            metric: MetricRecord {
                anonymity_set_size: size,
                encrypt_ms: total_ms / 2.0,
                aggregate_ms: total_ms / 4.0,
                total_ms,
                trial_index,
            },
            decrypt_ms: total_ms / 4.0,
            aggregate: 0,
            noise_budget_bits: 10.0,
        })
    }

    fn failed(size: i64, trial_index: Option<usize>) -> SweepRecord {
        SweepRecord::Failed(FailureRecord {
            anonymity_set_size: size,
            trial_index,
            reason: FailureReason::Parameter(ParameterError::unsupported_size(size, "test")),
        })
    }

    fn run() -> BenchmarkRun {
        let mut run = BenchmarkRun::new();
        run.extend([
            failed(-1, None),
            trial(8, 0, 4.0),
            trial(8, 1, 8.0),
            trial(16, 0, 10.0),
            failed(16, Some(1)),
        ]);
        run
    }

    #[test]
    fn summary_classifies_sizes() {
        let summary = run().summary();
        assert_eq!(summary.succeeded, vec![8]);
        assert_eq!(summary.partial, vec![16]);
        assert_eq!(summary.failed, vec![-1]);
        assert_eq!(summary.trials_ok, 3);
        assert_eq!(summary.trials_failed, 2);
    }

    #[test]
    fn group_means_average_per_size() {
        let means = run().group_means();
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].anonymity_set_size, 8);
        assert_eq!(means[0].runs, 2);
        assert_eq!(means[0].total_ms, 6.0);
        assert_eq!(means[0].encrypt_ms, 3.0);
        assert_eq!(means[1].anonymity_set_size, 16);
        assert_eq!(means[1].runs, 1);
        assert_eq!(means[1].total_ms, 10.0);
    }

    #[test]
    fn report_lists_every_size() {
        let text = run().report().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].contains("Total ms"));
        assert!(lines[2].trim_start().starts_with('8'));
        assert!(lines[3].trim_start().starts_with("16"));
        assert!(text.ends_with(
            "1 sizes succeeded, 1 partially failed, 1 failed (3 trials ok, 2 failed)"
        ));
    }

    #[test]
    fn published_records_stream_holds_only_json_lines() -> Result<()> {
        let mut records = Vec::new();
        let mut report = Vec::new();
        run().publish(&mut records, &mut report)?;

        let records = String::from_utf8(records)?;
        let parsed = records
            .lines()
            .map(|line| serde_json::from_str::<MetricRecord>(line))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(parsed, run().metrics().cloned().collect::<Vec<_>>());

        let report = String::from_utf8(report)?;
        assert!(report.contains("Total ms"));
        assert!(!records.contains("Total ms"));
        Ok(())
    }
}
