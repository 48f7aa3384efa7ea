// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instrumented routine for scheduler tests.

use async_trait::async_trait;
use hs_core::{ChoreError, Envelope, Routine};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().clone()
}

/// A scripted routine that records every stage invocation as `tag:stage`.
#[derive(Clone)]
pub struct Probe {
    pub tag: &'static str,
    pub log: Log,
    pub validate_ok: bool,
    pub prepare_ok: bool,
    pub execute_ok: bool,
    pub finalize_ok: bool,
    pub execute_delay: Duration,
    /// "ignored" maps to [`ChoreError::Ignored`]; any other message to
    /// [`ChoreError::Other`].
    pub execute_err: Option<&'static str>,
    /// Per-call overrides for `execute`; once drained, `execute_ok` applies.
    pub execute_script: Arc<Mutex<VecDeque<bool>>>,
}

impl Probe {
    pub fn new(tag: &'static str, log: &Log) -> Self {
        Self {
            tag,
            log: log.clone(),
            validate_ok: true,
            prepare_ok: true,
            execute_ok: true,
            finalize_ok: true,
            execute_delay: Duration::ZERO,
            execute_err: None,
            execute_script: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn script_execute(self, results: &[bool]) -> Self {
        *self.execute_script.lock() = results.iter().copied().collect();
        self
    }

    fn push(&self, stage: &str) {
        self.log.lock().push(format!("{}:{stage}", self.tag));
    }
}

#[async_trait]
impl Envelope for Probe {
    async fn validate(&self) -> Result<bool, ChoreError> {
        self.push("validate");
        Ok(self.validate_ok)
    }

    async fn prepare(&self) -> Result<bool, ChoreError> {
        self.push("prepare");
        Ok(self.prepare_ok)
    }

    async fn finalize(&self) -> Result<bool, ChoreError> {
        self.push("finalize");
        Ok(self.finalize_ok)
    }

    async fn failure(&self) {
        self.push("failure");
    }
}

#[async_trait]
impl Routine for Probe {
    async fn execute(&self) -> Result<bool, ChoreError> {
        self.push("execute");
        if !self.execute_delay.is_zero() {
            tokio::time::sleep(self.execute_delay).await;
        }
        match self.execute_err {
            Some("ignored") => Err(ChoreError::Ignored),
            Some(message) => Err(ChoreError::other(message)),
            None => {
                let scripted = self.execute_script.lock().pop_front();
                Ok(scripted.unwrap_or(self.execute_ok))
            }
        }
    }
}
