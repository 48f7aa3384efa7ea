// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Non-fatal warning sink.

/// Channel for warnings a human should eventually see.
///
/// Instincts and the scheduler report recoverable trouble here (missing
/// bed, empty chest, an interrupting chore that kept erroring). Nothing in
/// the core treats a warning as an error.
pub trait WarnSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Production sink: forwards to `tracing::warn!`.
#[derive(Clone, Default)]
pub struct TracingWarnSink;

impl WarnSink for TracingWarnSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Test sink: records every message for assertions.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct RecordingWarnSink {
    messages: std::sync::Arc<parking_lot::Mutex<Vec<String>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingWarnSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl WarnSink for RecordingWarnSink {
    fn warn(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
