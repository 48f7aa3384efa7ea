// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("persist failed: {0}")]
    Persist(String),
}
