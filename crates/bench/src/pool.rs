// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use rayon::{prelude::*, ThreadPool, ThreadPoolBuildError};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::warn;

const SLOW_TRIAL: Duration = Duration::from_secs(10);

/// Runs the independent trials of one sweep point on a rayon pool.
#[derive(Debug, Clone)]
pub struct TrialPool {
    thread_pool: Arc<ThreadPool>,
}

impl TrialPool {
    pub fn new(threads: usize) -> Result<TrialPool, ThreadPoolBuildError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("anonset-trial-{i}"))
            .build()?;

        Ok(Self {
            thread_pool: Arc::new(thread_pool),
        })
    }

    pub fn threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Run `op` for every index in `0..count`. Results come back in index
    /// order whatever order the trials finished in.
    pub fn run_all<T, OP>(&self, task_name: &str, count: usize, op: OP) -> Vec<T>
    where
        T: Send,
        OP: Fn(usize) -> T + Sync + Send,
    {
        self.thread_pool.install(|| {
            (0..count)
                .into_par_iter()
                .map(|index| {
                    let start = Instant::now();
                    let out = op(index);
                    let elapsed = start.elapsed();
                    if elapsed > SLOW_TRIAL {
                        warn!(
                            "Job '{task_name}#{index}' took {:.1}s",
                            elapsed.as_secs_f64()
                        );
                    }
                    out
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn results_keep_index_order() {
        let pool = TrialPool::new(4).unwrap();
        assert_eq!(pool.threads(), 4);
        let out = pool.run_all("square", 100, |i| {
            // later indices finish first
            std::thread::sleep(Duration::from_micros((100 - i as u64) * 10));
            i * i
        });
        assert_eq!(out, (0..100).map(|i| i * i).collect::<Vec<_>>());
    }

    #[test]
    fn every_index_runs_once() {
        let pool = TrialPool::new(2).unwrap();
        let calls = AtomicUsize::new(0);
        let out = pool.run_all("count", 17, |_| calls.fetch_add(1, Ordering::SeqCst));
        assert_eq!(out.len(), 17);
        assert_eq!(calls.load(Ordering::SeqCst), 17);
        assert!(pool.run_all("empty", 0, |i| i).is_empty());
    }
}
