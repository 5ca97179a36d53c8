// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Wall time of each pipeline stage in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTimings {
    pub encrypt_ms: f64,
    pub aggregate_ms: f64,
    pub decrypt_ms: f64,
    pub total_ms: f64,
}

impl StageTimings {
    pub fn new(encrypt: Duration, aggregate: Duration, decrypt: Duration) -> Self {
        let encrypt_ms = to_ms(encrypt);
        let aggregate_ms = to_ms(aggregate);
        let decrypt_ms = to_ms(decrypt);
        Self {
            encrypt_ms,
            aggregate_ms,
            decrypt_ms,
            total_ms: encrypt_ms + aggregate_ms + decrypt_ms,
        }
    }
}

fn to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Run `f`, returning its result alongside the elapsed wall time.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}
