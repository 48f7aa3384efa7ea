// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sleep instinct: go to bed at night, hold the bed until morning.

use async_trait::async_trait;
use hs_core::{Chore, ChoreError, Clock, Envelope, Priority, Routine};
use hs_engine::Foreman;
use hs_world::{Actuator, Perception, Position, WarnSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// World tick after which it counts as night.
pub const NIGHT_START_TICKS: u32 = 12542;

#[derive(Debug, Clone)]
pub struct SleepConfig {
    pub check_interval: Duration,
    /// Cadence of the is-it-morning-yet check while in bed.
    pub day_check_interval: Duration,
    pub bed: Position,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(10),
            day_check_interval: Duration::from_secs(1),
            bed: Position::default(),
        }
    }
}

pub struct SleepInstinct<C: Clock> {
    foreman: Foreman,
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    warn: Arc<dyn WarnSink>,
    clock: C,
    config: SleepConfig,
}

impl<C: Clock + 'static> SleepInstinct<C> {
    pub fn new(
        foreman: Foreman,
        actuator: Arc<dyn Actuator>,
        perception: Arc<dyn Perception>,
        warn: Arc<dyn WarnSink>,
        clock: C,
        config: SleepConfig,
    ) -> Self {
        Self { foreman, actuator, perception, warn, clock, config }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        let period = self.config.check_interval;
        tokio::spawn(async move {
            let mut tick = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                self.check();
            }
        })
    }

    /// One poll: at night, queue the (unique) sleep chore.
    pub fn check(&self) {
        if !is_night(self.perception.time_of_day()) {
            return;
        }
        let routine = SleepRoutine {
            actuator: self.actuator.clone(),
            perception: self.perception.clone(),
            warn: self.warn.clone(),
            bed: self.config.bed,
            day_check_interval: self.config.day_check_interval,
        };
        self.foreman.assign(
            Chore::build("Going to sleep")
                .key("sleep")
                .priority(Priority::Foreground)
                .created_at_ms(self.clock.epoch_ms())
                .single(routine),
        );
    }
}

fn is_night(time_of_day: u32) -> bool {
    time_of_day > NIGHT_START_TICKS
}

struct SleepRoutine {
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    warn: Arc<dyn WarnSink>,
    bed: Position,
    day_check_interval: Duration,
}

#[async_trait]
impl Envelope for SleepRoutine {
    async fn validate(&self) -> Result<bool, ChoreError> {
        Ok(is_night(self.perception.time_of_day()))
    }

    /// Get out of bed whether the night ended or an interruption cut the
    /// chore short.
    async fn finalize(&self) -> Result<bool, ChoreError> {
        self.actuator.wake_up().await?;
        Ok(true)
    }
}

#[async_trait]
impl Routine for SleepRoutine {
    async fn execute(&self) -> Result<bool, ChoreError> {
        self.actuator.go_to(self.bed).await?;

        let Some(block) = self.perception.block_at(self.bed) else {
            self.warn.warn(&format!("[sleep] cannot find a bed block at {}", self.bed));
            return Ok(false);
        };
        if !block.contains("bed") {
            self.warn.warn(&format!("[sleep] block at {} is not a bed", self.bed));
            return Ok(false);
        }

        self.actuator.sleep_in(self.bed).await?;
        while is_night(self.perception.time_of_day()) {
            tokio::time::sleep(self.day_check_interval).await;
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "sleep_tests.rs"]
mod tests;
