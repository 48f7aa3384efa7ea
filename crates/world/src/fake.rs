// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted in-memory world for tests.

use crate::actuator::Actuator;
use crate::perception::Perception;
use crate::types::{ItemStack, Position, WorldError};
use async_trait::async_trait;
use parking_lot::Mutex;
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// In-memory [`Actuator`] + [`Perception`] with scripted state.
///
/// Clones share state, so a test can keep one handle for assertions and
/// hand clones to chores. Every action is appended to an action log.
#[derive(Clone, Default)]
pub struct FakeWorld {
    state: Arc<Mutex<FakeState>>,
}

struct FakeState {
    saturation: f32,
    time_of_day: u32,
    position: Position,
    inventory: Vec<ItemStack>,
    held: Option<SmolStr>,
    blocks: HashMap<Position, SmolStr>,
    containers: HashMap<Position, Vec<ItemStack>>,
    players: HashMap<String, Position>,
    sleeping: bool,
    said: Vec<String>,
    actions: Vec<String>,
    travel_delay: Duration,
    unreachable: HashSet<Position>,
    /// Saturation restored per consumed item.
    eat_restores: f32,
    /// Block a plot turns into after `use_held_on`.
    planted_block: SmolStr,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            saturation: 20.0,
            time_of_day: 0,
            position: Position::default(),
            inventory: Vec::new(),
            held: None,
            blocks: HashMap::new(),
            containers: HashMap::new(),
            players: HashMap::new(),
            sleeping: false,
            said: Vec::new(),
            actions: Vec::new(),
            travel_delay: Duration::ZERO,
            unreachable: HashSet::new(),
            eat_restores: 6.0,
            planted_block: SmolStr::new("wheat_crop"),
        }
    }
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    // --- scripting ---

    pub fn set_saturation(&self, value: f32) {
        self.state.lock().saturation = value;
    }

    pub fn set_time_of_day(&self, ticks: u32) {
        self.state.lock().time_of_day = ticks;
    }

    pub fn set_block(&self, pos: Position, name: &str) {
        self.state.lock().blocks.insert(pos, SmolStr::new(name));
    }

    pub fn set_container(&self, pos: Position, items: Vec<ItemStack>) {
        self.state.lock().containers.insert(pos, items);
    }

    pub fn set_player(&self, name: &str, pos: Position) {
        self.state.lock().players.insert(name.to_string(), pos);
    }

    pub fn set_travel_delay(&self, delay: Duration) {
        self.state.lock().travel_delay = delay;
    }

    pub fn set_unreachable(&self, pos: Position) {
        self.state.lock().unreachable.insert(pos);
    }

    pub fn set_eat_restores(&self, value: f32) {
        self.state.lock().eat_restores = value;
    }

    pub fn add_item(&self, name: &str, count: u32) {
        self.state.lock().inventory.push(ItemStack::new(name, count));
    }

    // --- assertions ---

    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    pub fn said(&self) -> Vec<String> {
        self.state.lock().said.clone()
    }

    pub fn is_sleeping(&self) -> bool {
        self.state.lock().sleeping
    }

    pub fn item_count(&self, name: &str) -> u32 {
        self.state
            .lock()
            .inventory
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.count)
            .sum()
    }

    fn record(&self, action: String) {
        self.state.lock().actions.push(action);
    }
}

fn take_from(stacks: &mut Vec<ItemStack>, item: &str, count: u32) -> u32 {
    let mut taken = 0;
    for stack in stacks.iter_mut() {
        if stack.name == item && taken < count {
            let n = (count - taken).min(stack.count);
            stack.count -= n;
            taken += n;
        }
    }
    stacks.retain(|s| s.count > 0);
    taken
}

fn put_into(stacks: &mut Vec<ItemStack>, item: &str, count: u32) {
    if count == 0 {
        return;
    }
    if let Some(stack) = stacks.iter_mut().find(|s| s.name == item) {
        stack.count += count;
    } else {
        stacks.push(ItemStack::new(item, count));
    }
}

#[async_trait]
impl Actuator for FakeWorld {
    async fn go_to(&self, target: Position) -> Result<(), WorldError> {
        let delay = {
            let state = self.state.lock();
            if state.unreachable.contains(&target) {
                return Err(WorldError::Unreachable(target));
            }
            state.travel_delay
        };
        self.record(format!("go_to {target}"));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.state.lock().position = target;
        Ok(())
    }

    async fn equip(&self, item: &str) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        if !state.inventory.iter().any(|s| s.name == item) {
            return Err(WorldError::NoItem(item.to_string()));
        }
        state.held = Some(SmolStr::new(item));
        state.actions.push(format!("equip {item}"));
        Ok(())
    }

    async fn unequip(&self) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        state.held = None;
        state.actions.push("unequip".to_string());
        Ok(())
    }

    async fn consume_held(&self) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        let Some(held) = state.held.clone() else {
            return Err(WorldError::Protocol("nothing held".to_string()));
        };
        take_from(&mut state.inventory, &held, 1);
        state.saturation += state.eat_restores;
        state.actions.push(format!("consume {held}"));
        Ok(())
    }

    async fn sleep_in(&self, bed: Position) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        state.sleeping = true;
        state.actions.push(format!("sleep_in {bed}"));
        Ok(())
    }

    async fn wake_up(&self) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        state.sleeping = false;
        state.actions.push("wake_up".to_string());
        Ok(())
    }

    async fn open_container(&self, at: Position) -> Result<Vec<ItemStack>, WorldError> {
        let mut state = self.state.lock();
        state.actions.push(format!("open_container {at}"));
        state.containers.get(&at).cloned().ok_or(WorldError::MissingBlock(at))
    }

    async fn withdraw(&self, from: Position, item: &str, count: u32) -> Result<u32, WorldError> {
        let mut state = self.state.lock();
        let Some(mut stacks) = state.containers.remove(&from) else {
            return Err(WorldError::MissingBlock(from));
        };
        let taken = take_from(&mut stacks, item, count);
        state.containers.insert(from, stacks);
        put_into(&mut state.inventory, item, taken);
        state.actions.push(format!("withdraw {count} {item}"));
        Ok(taken)
    }

    async fn deposit(&self, into: Position, item: &str, count: u32) -> Result<u32, WorldError> {
        let mut state = self.state.lock();
        if !state.containers.contains_key(&into) {
            return Err(WorldError::MissingBlock(into));
        }
        let stored = take_from(&mut state.inventory, item, count);
        if let Some(stacks) = state.containers.get_mut(&into) {
            put_into(stacks, item, stored);
        }
        state.actions.push(format!("deposit {count} {item}"));
        Ok(stored)
    }

    async fn use_held_on(&self, target: Position) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        let Some(held) = state.held.clone() else {
            return Err(WorldError::Protocol("nothing held".to_string()));
        };
        let planted = state.planted_block.clone();
        state.blocks.insert(target, planted);
        state.actions.push(format!("use {held} on {target}"));
        Ok(())
    }

    async fn say(&self, message: &str) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        state.said.push(message.to_string());
        state.actions.push("say".to_string());
        Ok(())
    }
}

impl Perception for FakeWorld {
    fn saturation(&self) -> f32 {
        self.state.lock().saturation
    }

    fn time_of_day(&self) -> u32 {
        self.state.lock().time_of_day
    }

    fn position(&self) -> Position {
        self.state.lock().position
    }

    fn inventory(&self) -> Vec<ItemStack> {
        self.state.lock().inventory.clone()
    }

    fn block_at(&self, pos: Position) -> Option<SmolStr> {
        self.state.lock().blocks.get(&pos).cloned()
    }

    fn player_position(&self, name: &str) -> Option<Position> {
        self.state.lock().players.get(name).copied()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
