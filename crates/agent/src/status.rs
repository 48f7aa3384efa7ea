// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status snapshot DTO for the dashboard collaborator.

use hs_engine::{ChoreSummary, UnitSummary};
use serde::Serialize;

/// Serializable snapshot of the agent's scheduling state. Decoupled from
/// live state so the dashboard can render it without touching the queue.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub phase: String,
    pub settled: bool,
    pub current: Option<ChoreSummary>,
    pub current_unit: Option<UnitSummary>,
    pub queue: Vec<ChoreSummary>,
}
