// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Farm instinct: plant the configured plots as one batch chore.
//!
//! The envelope fetches a hoe and seeds from the chest once for the whole
//! batch and returns them when the batch ends; each sub-unit plants one
//! plot, skipping plots that are already growing.

use async_trait::async_trait;
use hs_core::{Batch, Chore, ChoreError, Clock, Envelope, Priority, Routine, WorkUnit};
use hs_engine::Foreman;
use hs_world::{Actuator, ItemStack, Perception, Position, WarnSink};
use smol_str::SmolStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const HOES: &[&str] = &["wooden_hoe", "stone_hoe", "iron_hoe", "diamond_hoe", "netherite_hoe"];
const SEEDS: &[&str] = &["wheat_seeds", "beetroot_seeds", "carrot", "potato"];
const SEED_WITHDRAW_COUNT: u32 = 64;

/// Block name a plot must have to be plantable.
const PLANTABLE_BLOCK: &str = "farmland";

#[derive(Debug, Clone)]
pub struct FarmConfig {
    pub check_interval: Duration,
    pub chest: Position,
    pub plots: Vec<Position>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(300),
            chest: Position::default(),
            plots: Vec::new(),
        }
    }
}

pub struct FarmInstinct<C: Clock> {
    foreman: Foreman,
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    warn: Arc<dyn WarnSink>,
    clock: C,
    config: FarmConfig,
}

impl<C: Clock + 'static> FarmInstinct<C> {
    pub fn new(
        foreman: Foreman,
        actuator: Arc<dyn Actuator>,
        perception: Arc<dyn Perception>,
        warn: Arc<dyn WarnSink>,
        clock: C,
        config: FarmConfig,
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

    /// One poll: queue the (unique) farming batch when plots are configured.
    pub fn check(&self) {
        if self.config.plots.is_empty() {
            return;
        }
        let units = self
            .config
            .plots
            .iter()
            .enumerate()
            .map(|(index, plot)| {
                WorkUnit::new(
                    format!("plot {index}"),
                    PlantPlot {
                        actuator: self.actuator.clone(),
                        perception: self.perception.clone(),
                        plot: *plot,
                    },
                )
            })
            .collect();
        let envelope = GatherTools {
            actuator: self.actuator.clone(),
            perception: self.perception.clone(),
            warn: self.warn.clone(),
            chest: self.config.chest,
        };
        self.foreman.assign(
            Chore::build("Farming")
                .key("farm")
                .priority(Priority::Plain)
                .created_at_ms(self.clock.epoch_ms())
                .batch(Batch::new(units).with_envelope(envelope)),
        );
    }
}

/// Batch envelope: hoe and seeds in hand before the first plot, tools back
/// in the chest when the batch ends.
struct GatherTools {
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    warn: Arc<dyn WarnSink>,
    chest: Position,
}

#[async_trait]
impl Envelope for GatherTools {
    async fn prepare(&self) -> Result<bool, ChoreError> {
        let inventory = self.perception.inventory();
        if has_any(&inventory, HOES) && has_any(&inventory, SEEDS) {
            return Ok(true);
        }

        self.actuator.go_to(self.chest).await?;
        let contents = self.actuator.open_container(self.chest).await?;

        if !has_any(&inventory, HOES) {
            if !has_any(&contents, HOES) {
                self.warn.warn(&format!("[farm] no hoe in the chest at {}", self.chest));
                return Ok(false);
            }
            for hoe in HOES {
                if self.actuator.withdraw(self.chest, hoe, 1).await? > 0 {
                    break;
                }
            }
        }

        if !has_any(&inventory, SEEDS) {
            if !has_any(&contents, SEEDS) {
                self.warn.warn(&format!("[farm] no seeds in the chest at {}", self.chest));
                return Ok(false);
            }
            for seed in SEEDS {
                if self.actuator.withdraw(self.chest, seed, SEED_WITHDRAW_COUNT).await? > 0 {
                    break;
                }
            }
        }
        Ok(true)
    }

    async fn finalize(&self) -> Result<bool, ChoreError> {
        self.actuator.go_to(self.chest).await?;
        for name in HOES.iter().chain(SEEDS) {
            let count = stack_count(&self.perception.inventory(), name);
            if count > 0 {
                self.actuator.deposit(self.chest, name, count).await?;
            }
        }
        Ok(true)
    }
}

/// One plot: walk over, put seeds in hand, plant.
struct PlantPlot {
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    plot: Position,
}

#[async_trait]
impl Envelope for PlantPlot {
    async fn validate(&self) -> Result<bool, ChoreError> {
        Ok(self
            .perception
            .block_at(self.plot)
            .is_some_and(|block| block == PLANTABLE_BLOCK))
    }
}

#[async_trait]
impl Routine for PlantPlot {
    async fn execute(&self) -> Result<bool, ChoreError> {
        self.actuator.go_to(self.plot).await?;
        let Some(seed) = first_of(&self.perception.inventory(), SEEDS) else {
            return Ok(false);
        };
        self.actuator.equip(&seed).await?;
        self.actuator.use_held_on(self.plot).await?;
        Ok(true)
    }
}

fn has_any(stacks: &[ItemStack], names: &[&str]) -> bool {
    stacks.iter().any(|stack| names.contains(&stack.name.as_str()))
}

fn first_of(stacks: &[ItemStack], names: &[&str]) -> Option<SmolStr> {
    stacks
        .iter()
        .find(|stack| names.contains(&stack.name.as_str()))
        .map(|stack| stack.name.clone())
}

fn stack_count(stacks: &[ItemStack], name: &str) -> u32 {
    stacks.iter().filter(|stack| stack.name == name).map(|stack| stack.count).sum()
}

#[cfg(test)]
#[path = "farm_tests.rs"]
mod tests;
