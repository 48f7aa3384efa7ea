// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent configuration.
//!
//! Every field has a default so an empty file is a valid config. Cadences
//! are in milliseconds to match the instincts' native units.

use crate::AgentError;
use hs_instincts::{EatConfig, FarmConfig, SleepConfig};
use hs_world::Position;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Tracing filter, e.g. "info" or "hs_engine=debug,info".
    pub log_filter: LogFilter,
    pub eat: EatSection,
    pub sleep: SleepSection,
    pub farm: FarmSection,
}

/// Newtype so the default can live next to the field definitions.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct LogFilter(pub String);

impl Default for LogFilter {
    fn default() -> Self {
        Self("info".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EatSection {
    pub enabled: bool,
    pub check_interval_ms: u64,
    pub hungry_at: f32,
    pub starving_at: f32,
}

impl Default for EatSection {
    fn default() -> Self {
        Self { enabled: true, check_interval_ms: 3_000, hungry_at: 17.0, starving_at: 6.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SleepSection {
    pub enabled: bool,
    pub check_interval_ms: u64,
    pub day_check_interval_ms: u64,
    pub bed: Position,
}

impl Default for SleepSection {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_ms: 10_000,
            day_check_interval_ms: 1_000,
            bed: Position::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FarmSection {
    pub enabled: bool,
    pub check_interval_ms: u64,
    pub chest: Position,
    pub plots: Vec<Position>,
}

impl Default for FarmSection {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_ms: 300_000,
            chest: Position::default(),
            plots: Vec::new(),
        }
    }
}

impl AgentConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, AgentError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub(crate) fn eat_config(&self) -> EatConfig {
        EatConfig {
            check_interval: Duration::from_millis(self.eat.check_interval_ms),
            hungry_at: self.eat.hungry_at,
            starving_at: self.eat.starving_at,
        }
    }

    pub(crate) fn sleep_config(&self) -> SleepConfig {
        SleepConfig {
            check_interval: Duration::from_millis(self.sleep.check_interval_ms),
            day_check_interval: Duration::from_millis(self.sleep.day_check_interval_ms),
            bed: self.sleep.bed,
        }
    }

    pub(crate) fn farm_config(&self) -> FarmConfig {
        FarmConfig {
            check_interval: Duration::from_millis(self.farm.check_interval_ms),
            chest: self.farm.chest,
            plots: self.farm.plots.clone(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
