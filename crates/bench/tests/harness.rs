// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anonset_bench::{
    BenchError, BenchmarkHarness, FailureReason, MemorySink, SweepRecord, UniformValues,
};
use anonset_fhe::{BackendError, BfvBackend, ParameterError};
use anonset_test_helpers::{
    with_captured_tracing, with_tracing, FaultyBackend, MockBackend, UnavailableBackend,
};

#[test]
fn invalid_sizes_leave_markers_and_the_sweep_continues() {
    let _guard = with_tracing("info");
    let harness = BenchmarkHarness::<BfvBackend>::new(1000, Some(42), 2).unwrap();
    let run = harness.run(&[0, -5, 8], 2, &UniformValues).unwrap();

    let failures: Vec<_> = run.failures().collect();
    assert_eq!(failures.len(), 2);
    for (failure, size) in failures.iter().zip([0i64, -5]) {
        assert_eq!(failure.anonymity_set_size, size);
        assert_eq!(failure.trial_index, None);
        assert!(matches!(
            failure.reason,
            FailureReason::Parameter(ParameterError::UnsupportedSize { size: s, .. }) if s == size
        ));
    }

    let metrics: Vec<_> = run.metrics().collect();
    assert_eq!(metrics.len(), 2);
    for (i, m) in metrics.iter().enumerate() {
        assert_eq!(m.anonymity_set_size, 8);
        assert_eq!(m.trial_index, i);
        assert!(m.encrypt_ms > 0.0);
        assert!(m.total_ms >= m.encrypt_ms + m.aggregate_ms);
    }

    let summary = run.summary();
    assert_eq!(summary.succeeded, vec![8]);
    assert_eq!(summary.failed, vec![0, -5]);
}

#[test]
fn oversized_sets_fail_without_stopping_the_run() {
    let harness = BenchmarkHarness::<MockBackend>::new(1000, Some(1), 1).unwrap();
    let run = harness.run(&[40_000, 4], 3, &UniformValues).unwrap();

    assert!(matches!(
        run.records()[0],
        SweepRecord::Failed(ref f) if f.anonymity_set_size == 40_000 && f.trial_index.is_none()
    ));
    assert_eq!(run.metrics().count(), 3);
}

#[test]
fn a_wrong_aggregate_fails_only_its_trial() {
    let harness = BenchmarkHarness::<FaultyBackend>::new(1000, Some(4), 2).unwrap();
    let run = harness.run(&[8, 16], 4, &UniformValues).unwrap();
    assert_eq!(run.records().len(), 8);

    for size in [8i64, 16] {
        let failures: Vec<_> = run
            .failures()
            .filter(|f| f.anonymity_set_size == size)
            .collect();
        assert_eq!(failures.len(), 1, "size {size}");
        let failure = failures[0];
        let trial = failure.trial_index.expect("trial failures carry their index");
        assert!(trial < 4);
        assert!(matches!(
            failure.reason,
            FailureReason::WrongAggregate { expected, actual } if actual == expected + 1
        ));

        let trials: Vec<_> = run
            .metrics()
            .filter(|m| m.anonymity_set_size as i64 == size)
            .map(|m| m.trial_index)
            .collect();
        assert_eq!(trials.len(), 3);
        assert!(!trials.contains(&trial));
    }

    let summary = run.summary();
    assert!(summary.succeeded.is_empty());
    assert_eq!(summary.partial, vec![8, 16]);
    assert!(summary.failed.is_empty());
    assert_eq!((summary.trials_ok, summary.trials_failed), (6, 2));
}

#[test]
fn unavailable_backend_aborts_before_any_trial() {
    let (_guard, logs) = with_captured_tracing("info");
    let harness = BenchmarkHarness::<UnavailableBackend>::new(1000, Some(1), 1).unwrap();
    let Err(err) = harness.run(&[8], 1, &UniformValues) else {
        panic!("expected the probe to fail");
    };
    assert!(matches!(
        err,
        BenchError::DependencyUnavailable(BackendError::DependencyUnavailable { .. })
    ));

    let logs = logs.contents();
    assert_eq!(logs.matches("ERROR").count(), 1, "{logs}");
    assert!(logs.contains("library not linked"));
    assert!(!logs.contains("Benchmarking"));
}

#[test]
fn zero_trials_are_refused() {
    let harness = BenchmarkHarness::<MockBackend>::new(1000, Some(1), 1).unwrap();
    assert!(matches!(
        harness.run(&[8], 0, &UniformValues),
        Err(BenchError::NoTrials)
    ));
}

#[test]
fn metrics_flow_into_a_sink() {
    let harness = BenchmarkHarness::<MockBackend>::new(1000, Some(9), 2).unwrap();
    let run = harness.run(&[8, 16, 32, 64], 5, &UniformValues).unwrap();

    let mut sink = MemorySink::new();
    run.write_to(&mut sink).unwrap();
    assert_eq!(sink.records().len(), 20);

    let means = run.group_means();
    assert_eq!(
        means.iter().map(|m| (m.anonymity_set_size, m.runs)).collect::<Vec<_>>(),
        vec![(8, 5), (16, 5), (32, 5), (64, 5)]
    );
}
