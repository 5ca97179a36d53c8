// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, fmt::MakeWriter, EnvFilter};

pub fn create_rng_from_u64(value: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(value)
}

/// Route tracing output of the current test through the test writer. Keep
/// the guard alive for the duration of the test.
pub fn with_tracing(filter: &str) -> DefaultGuard {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// In-memory log destination shared between a subscriber and a test.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Like [`with_tracing`] but records the output of the current thread so
/// the test can inspect it.
pub fn with_captured_tracing(filter: &str) -> (DefaultGuard, LogBuffer) {
    let buffer = LogBuffer::default();
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .with_writer(buffer.clone())
        .finish();

    (tracing::subscriber::set_default(subscriber), buffer)
}
