// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors a lifecycle stage may return.

use thiserror::Error;

/// Error surfaced by a chore lifecycle stage.
///
/// Stages report ordinary "this didn't work out" results through their
/// `Ok(bool)` return; an `Err` means the stage could not run to a verdict
/// at all. The scheduler never lets one of these escape its run loop.
#[derive(Debug, Error)]
pub enum ChoreError {
    /// Internal control-flow unwind. The scheduler swallows this without
    /// logging and without invoking `failure()`.
    #[error("ignored")]
    Ignored,

    /// A world operation failed underneath the stage.
    #[error("world: {0}")]
    World(String),

    /// Anything else the stage wants to surface.
    #[error("{0}")]
    Other(String),
}

impl ChoreError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}
