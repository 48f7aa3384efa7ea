// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat instinct: turn player commands into chores.
//!
//! Protocol handling is external; commands arrive on a channel already
//! split into sender and message. `!come` preempts everything, `!status`
//! answers directly from queue introspection.

use async_trait::async_trait;
use hs_core::{Chore, ChoreError, Clock, Envelope, Priority, Routine};
use hs_engine::Foreman;
use hs_world::{Actuator, Perception, Position, WarnSink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One chat message addressed to the agent.
#[derive(Debug, Clone)]
pub struct ChatCommand {
    pub sender: String,
    pub message: String,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Parsed {
    /// Not addressed to the agent.
    Ignored,
    /// Addressed to the agent but not understood.
    Unknown,
    Come,
    Status,
}

pub(crate) fn parse(message: &str) -> Parsed {
    let Some(command) = message.strip_prefix('!') else {
        return Parsed::Ignored;
    };
    match command.trim() {
        "come" => Parsed::Come,
        "status" => Parsed::Status,
        _ => Parsed::Unknown,
    }
}

pub struct ChatInstinct<C: Clock> {
    foreman: Foreman,
    actuator: Arc<dyn Actuator>,
    perception: Arc<dyn Perception>,
    warn: Arc<dyn WarnSink>,
    clock: C,
    commands: mpsc::Receiver<ChatCommand>,
}

impl<C: Clock + 'static> ChatInstinct<C> {
    pub fn new(
        foreman: Foreman,
        actuator: Arc<dyn Actuator>,
        perception: Arc<dyn Perception>,
        warn: Arc<dyn WarnSink>,
        clock: C,
        commands: mpsc::Receiver<ChatCommand>,
    ) -> Self {
        Self { foreman, actuator, perception, warn, clock, commands }
    }

    /// Consume the command stream until the sender side closes.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(command) = self.commands.recv().await {
                self.handle(command).await;
            }
        })
    }

    async fn handle(&self, command: ChatCommand) {
        match parse(&command.message) {
            Parsed::Ignored => {}
            Parsed::Unknown => {
                self.warn.warn(&format!(
                    "[chat] unknown command from {}: {}",
                    command.sender, command.message
                ));
            }
            Parsed::Status => {
                let report = match self.foreman.current() {
                    Some(chore) => format!("Working on: {}", chore.display_name),
                    None => "Idle".to_string(),
                };
                if let Err(err) = self.actuator.say(&report).await {
                    self.warn.warn(&format!("[chat] cannot answer {}: {err}", command.sender));
                }
            }
            Parsed::Come => {
                let Some(target) = self.perception.player_position(&command.sender) else {
                    self.warn.warn(&format!("[chat] cannot see {}", command.sender));
                    return;
                };
                self.foreman.assign(
                    Chore::build(format!("Coming to {}", command.sender))
                        .priority(Priority::ForceInterrupt)
                        .created_at_ms(self.clock.epoch_ms())
                        .single(ComeRoutine { actuator: self.actuator.clone(), target }),
                );
            }
        }
    }
}

struct ComeRoutine {
    actuator: Arc<dyn Actuator>,
    target: Position,
}

#[async_trait]
impl Envelope for ComeRoutine {}

#[async_trait]
impl Routine for ComeRoutine {
    async fn execute(&self) -> Result<bool, ChoreError> {
        self.actuator.go_to(self.target).await?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;
