// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hs_core::FakeClock;
use hs_world::{FakeWorld, TracingWarnSink};
use std::time::Duration;

fn instinct(world: &FakeWorld, config: EatConfig) -> (EatInstinct<FakeClock>, Foreman, hs_engine::ForemanDriver) {
    let (foreman, driver) = Foreman::new(Arc::new(TracingWarnSink));
    let instinct = EatInstinct::new(
        foreman.clone(),
        Arc::new(world.clone()),
        Arc::new(world.clone()),
        FakeClock::new(),
        config,
    );
    (instinct, foreman, driver)
}

async fn settled_within(foreman: &Foreman) {
    tokio::time::timeout(Duration::from_secs(2), foreman.settled())
        .await
        .unwrap();
}

#[yare::parameterized(
    sated = { 20.0, None },
    hungry_boundary = { 17.0, Some(Priority::SoftInterrupt) },
    peckish = { 10.0, Some(Priority::SoftInterrupt) },
    starving_boundary = { 6.0, Some(Priority::ForceInterrupt) },
    empty = { 0.0, Some(Priority::ForceInterrupt) },
)]
fn priority_scales_with_hunger(saturation: f32, expected: Option<Priority>) {
    assert_eq!(priority_for(saturation, &EatConfig::default()), expected);
}

#[test]
fn cheapest_food_prefers_low_value_items() {
    let inventory = vec![
        ItemStack::new("cooked_beef", 3),
        ItemStack::new("carrot", 5),
        ItemStack::new("bread", 1),
    ];
    assert_eq!(cheapest_food(&inventory).as_deref(), Some("carrot"));
}

#[test]
fn cheapest_food_skips_banned_and_inedible_items() {
    let inventory = vec![
        ItemStack::new("rotten_flesh", 10),
        ItemStack::new("cobblestone", 64),
        ItemStack::new("bread", 2),
    ];
    assert_eq!(cheapest_food(&inventory).as_deref(), Some("bread"));
}

#[test]
fn cheapest_food_none_when_nothing_edible() {
    let inventory = vec![ItemStack::new("pufferfish", 1), ItemStack::new("dirt", 3)];
    assert_eq!(cheapest_food(&inventory), None);
}

#[test]
fn sated_agent_assigns_nothing() {
    let world = FakeWorld::new();
    world.set_saturation(20.0);
    let (instinct, foreman, _driver) = instinct(&world, EatConfig::default());
    instinct.check();
    assert!(foreman.is_settled());
}

#[tokio::test]
async fn hungry_agent_eats_until_sated() {
    let world = FakeWorld::new();
    world.set_saturation(10.0);
    world.set_eat_restores(4.0);
    world.add_item("bread", 5);
    let (instinct, foreman, driver) = instinct(&world, EatConfig::default());

    tokio::spawn(driver.run());
    instinct.check();
    settled_within(&foreman).await;

    assert!(world.saturation() > 17.0);
    // 10 -> 14 -> 18: two loaves
    assert_eq!(world.item_count("bread"), 3);
    let actions = world.actions();
    assert_eq!(actions.iter().filter(|a| *a == "consume bread").count(), 2);
}

#[tokio::test]
async fn starving_agent_with_no_food_pleads_in_chat() {
    let world = FakeWorld::new();
    world.set_saturation(5.0);
    let (instinct, foreman, driver) = instinct(&world, EatConfig::default());

    tokio::spawn(driver.run());
    instinct.check();
    settled_within(&foreman).await;

    let said = world.said();
    assert_eq!(said.len(), 1);
    assert!(said[0].contains("I AM VERY HUNGRY!!!"), "{said:?}");
}
