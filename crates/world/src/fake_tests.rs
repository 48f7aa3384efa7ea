// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::warn::{RecordingWarnSink, WarnSink};

#[tokio::test]
async fn go_to_moves_and_records() {
    let world = FakeWorld::new();
    let target = Position::new(1, 2, 3);
    world.go_to(target).await.unwrap();
    assert_eq!(world.position(), target);
    assert_eq!(world.actions(), vec!["go_to (1, 2, 3)"]);
}

#[tokio::test]
async fn go_to_unreachable_errors() {
    let world = FakeWorld::new();
    let target = Position::new(9, 9, 9);
    world.set_unreachable(target);
    let err = world.go_to(target).await.unwrap_err();
    assert!(matches!(err, WorldError::Unreachable(p) if p == target));
}

#[tokio::test]
async fn equip_requires_inventory_item() {
    let world = FakeWorld::new();
    assert!(world.equip("bread").await.is_err());
    world.add_item("bread", 2);
    world.equip("bread").await.unwrap();
}

#[tokio::test]
async fn consume_held_restores_saturation_and_spends_item() {
    let world = FakeWorld::new();
    world.set_saturation(10.0);
    world.set_eat_restores(4.0);
    world.add_item("bread", 2);
    world.equip("bread").await.unwrap();
    world.consume_held().await.unwrap();
    assert_eq!(world.saturation(), 14.0);
    assert_eq!(world.item_count("bread"), 1);
}

#[tokio::test]
async fn withdraw_moves_items_from_container() {
    let world = FakeWorld::new();
    let chest = Position::new(0, 0, 0);
    world.set_container(chest, vec![ItemStack::new("wheat_seeds", 10)]);
    let taken = world.withdraw(chest, "wheat_seeds", 64).await.unwrap();
    assert_eq!(taken, 10);
    assert_eq!(world.item_count("wheat_seeds"), 10);
    let remaining = world.open_container(chest).await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn deposit_moves_items_back() {
    let world = FakeWorld::new();
    let chest = Position::new(0, 0, 0);
    world.set_container(chest, vec![]);
    world.add_item("wheat_seeds", 5);
    let stored = world.deposit(chest, "wheat_seeds", 5).await.unwrap();
    assert_eq!(stored, 5);
    assert_eq!(world.item_count("wheat_seeds"), 0);
    let contents = world.open_container(chest).await.unwrap();
    assert_eq!(contents, vec![ItemStack::new("wheat_seeds", 5)]);
}

#[tokio::test]
async fn use_held_on_plants_the_block() {
    let world = FakeWorld::new();
    let plot = Position::new(4, 0, 4);
    world.set_block(plot, "farmland");
    world.add_item("wheat_seeds", 1);
    world.equip("wheat_seeds").await.unwrap();
    world.use_held_on(plot).await.unwrap();
    assert_eq!(world.block_at(plot).as_deref(), Some("wheat_crop"));
}

#[tokio::test]
async fn sleep_toggles() {
    let world = FakeWorld::new();
    world.sleep_in(Position::new(0, 0, 0)).await.unwrap();
    assert!(world.is_sleeping());
    world.wake_up().await.unwrap();
    assert!(!world.is_sleeping());
}

#[tokio::test]
async fn say_is_recorded() {
    let world = FakeWorld::new();
    world.say("hello").await.unwrap();
    assert_eq!(world.said(), vec!["hello"]);
}

#[test]
fn player_positions() {
    let world = FakeWorld::new();
    world.set_player("ada", Position::new(7, 0, 7));
    assert_eq!(world.player_position("ada"), Some(Position::new(7, 0, 7)));
    assert_eq!(world.player_position("bob"), None);
}

#[test]
fn recording_warn_sink_collects() {
    let sink = RecordingWarnSink::new();
    assert!(sink.is_empty());
    sink.warn("uh oh");
    assert_eq!(sink.messages(), vec!["uh oh"]);
}
