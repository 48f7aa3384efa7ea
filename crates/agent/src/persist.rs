// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence hook for graceful shutdown.

use crate::AgentError;
use async_trait::async_trait;

/// Called once during shutdown, after every chore has settled and before
/// the scheduler is parked. Persistence itself lives with the embedder;
/// the agent only guarantees the ordering.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn persist(&self) -> Result<(), AgentError>;
}

/// Default hook for embedders with nothing to save.
#[derive(Clone, Default)]
pub struct NoopPersister;

#[async_trait]
impl Persister for NoopPersister {
    async fn persist(&self) -> Result<(), AgentError> {
        tracing::debug!("nothing to persist");
        Ok(())
    }
}
