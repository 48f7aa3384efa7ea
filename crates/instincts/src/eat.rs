// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Eat instinct: keep saturation up.
//!
//! Hungry submits a soft interrupt; starving submits a force interrupt.
//! The chore itself eats the cheapest edible item until sated and asks for
//! help in chat when the inventory has nothing edible.

use async_trait::async_trait;
use hs_core::{Chore, ChoreError, Clock, Envelope, Priority, Routine};
use hs_engine::Foreman;
use hs_world::{Actuator, ItemStack, Perception};
use smol_str::SmolStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const BANNED_FOOD: &[&str] =
    &["rotten_flesh", "pufferfish", "chorus_fruit", "poisonous_potato", "spider_eye"];

/// Hunger restored per item. Cheapest first, so good food is saved for
/// emergencies.
const FOOD_POINTS: &[(&str, u32)] = &[
    ("apple", 4),
    ("baked_potato", 5),
    ("bread", 5),
    ("carrot", 3),
    ("cooked_beef", 8),
    ("cooked_chicken", 6),
    ("cooked_porkchop", 8),
    ("golden_carrot", 6),
    ("melon_slice", 2),
    ("potato", 1),
];

#[derive(Debug, Clone)]
pub struct EatConfig {
    pub check_interval: Duration,
    /// Saturation at or below which the agent should eat.
    pub hungry_at: f32,
    /// Saturation at or below which eating preempts everything.
    pub starving_at: f32,
}

impl Default for EatConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(3),
            hungry_at: 17.0,
            starving_at: 6.0,
        }
    }
}

pub struct EatInstinct<C: Clock> {
    foreman: Foreman,
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    clock: C,
    config: EatConfig,
}

impl<C: Clock + 'static> EatInstinct<C> {
    pub fn new(
        foreman: Foreman,
        actuator: Arc<dyn Actuator>,
        perception: Arc<dyn Perception>,
        clock: C,
        config: EatConfig,
    ) -> Self {
        Self { foreman, actuator, perception, clock, config }
    }

    /// Run the periodic check on its own task.
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

    /// One poll: assign an eating chore if saturation demands it.
    pub fn check(&self) {
        let Some(priority) = priority_for(self.perception.saturation(), &self.config) else {
            return;
        };
        let routine = EatRoutine {
            actuator: self.actuator.clone(),
            perception: self.perception.clone(),
            hungry_at: self.config.hungry_at,
            starving_at: self.config.starving_at,
        };
        self.foreman.assign(
            Chore::build("Eating")
                .priority(priority)
                .created_at_ms(self.clock.epoch_ms())
                .single(routine),
        );
    }
}

/// None when sated; otherwise how urgently eating preempts.
pub(crate) fn priority_for(saturation: f32, config: &EatConfig) -> Option<Priority> {
    if saturation <= config.starving_at {
        Some(Priority::ForceInterrupt)
    } else if saturation <= config.hungry_at {
        Some(Priority::SoftInterrupt)
    } else {
        None
    }
}

struct EatRoutine {
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    hungry_at: f32,
    starving_at: f32,
}

#[async_trait]
impl Envelope for EatRoutine {
    async fn validate(&self) -> Result<bool, ChoreError> {
        Ok(self.perception.saturation() <= self.hungry_at)
    }
}

#[async_trait]
impl Routine for EatRoutine {
    async fn execute(&self) -> Result<bool, ChoreError> {
        loop {
            let saturation = self.perception.saturation();
            if saturation > self.hungry_at {
                return Ok(true);
            }
            let Some(food) = cheapest_food(&self.perception.inventory()) else {
                let plea = if saturation <= self.starving_at {
                    "I AM VERY HUNGRY!!!"
                } else {
                    "I am hungry!!"
                };
                self.actuator.say(&format!("{plea} saturation: {saturation}")).await?;
                return Ok(false);
            };
            self.actuator.equip(&food).await?;
            self.actuator.consume_held().await?;
            self.actuator.unequip().await?;
        }
    }
}

fn food_points(name: &str) -> Option<u32> {
    FOOD_POINTS.iter().find(|(food, _)| *food == name).map(|(_, points)| *points)
}

/// The cheapest edible, non-banned item in the inventory.
pub(crate) fn cheapest_food(inventory: &[ItemStack]) -> Option<SmolStr> {
    inventory
        .iter()
        .filter(|stack| !BANNED_FOOD.contains(&stack.name.as_str()))
        .filter_map(|stack| food_points(&stack.name).map(|points| (points, stack.name.clone())))
        .min_by_key(|(points, _)| *points)
        .map(|(_, name)| name)
}

#[cfg(test)]
#[path = "eat_tests.rs"]
mod tests;
