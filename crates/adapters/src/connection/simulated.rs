// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer-driven simulated connections.
//!
//! Each session is a background task that sleeps through a handshake
//! delay, then reports `Connected` and keeps emitting activity until it is
//! disconnected or a simulated network drop ends it. No packets are sent.

use super::{ConnectSpec, ConnectionAdapter, ConnectionError, ConnectionHandle};
use async_trait::async_trait;
use mcb_core::{BotEvent, Command, CommandReply, Direction, IdGen, UuidIdGen};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Blocks per second when walking
const WALK_SPEED: f64 = 4.317;

/// Tunables for the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Time from connect to `Connected`
    pub handshake: Duration,
    /// Probability that a handshake fails, 0.0..=1.0
    pub connect_failure_rate: f64,
    /// Probability of a network drop per activity tick, 0.0..=1.0
    pub drop_rate: f64,
    /// How often an established session rolls for a drop
    pub activity_interval: Duration,
    /// How often anti-AFK jumps happen when enabled
    pub anti_afk_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            handshake: Duration::from_secs(2),
            connect_failure_rate: 0.0,
            drop_rate: 0.0,
            activity_interval: Duration::from_secs(30),
            anti_afk_interval: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f64,
    y: f64,
    z: f64,
}

struct SimSession {
    spec: ConnectSpec,
    connected: bool,
    position: Position,
    health: u8,
    food: u8,
    event_tx: mpsc::Sender<BotEvent>,
    task: Option<JoinHandle<()>>,
}

/// Adapter that simulates Minecraft sessions with timers
#[derive(Clone)]
pub struct SimulatedAdapter<G: IdGen = UuidIdGen> {
    config: SimulationConfig,
    id_gen: G,
    sessions: Arc<Mutex<HashMap<String, SimSession>>>,
}

impl SimulatedAdapter<UuidIdGen> {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_id_gen(config, UuidIdGen)
    }
}

impl<G: IdGen> SimulatedAdapter<G> {
    pub fn with_id_gen(config: SimulationConfig, id_gen: G) -> Self {
        Self {
            config,
            id_gen,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of sessions currently open or opening
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

fn roll(rate: f64) -> bool {
    rate > 0.0 && rand::random::<f64>() < rate
}

fn spawn_position() -> Position {
    Position {
        x: 0.5,
        y: 64.0,
        z: 0.5,
    }
}

async fn run_session(
    sessions: Arc<Mutex<HashMap<String, SimSession>>>,
    session_id: String,
    spec: ConnectSpec,
    config: SimulationConfig,
    event_tx: mpsc::Sender<BotEvent>,
) {
    let bot_id = spec.bot_id.clone();
    let generation = spec.generation;

    tokio::time::sleep(config.handshake).await;

    if roll(config.connect_failure_rate) {
        sessions.lock().remove(&session_id);
        let _ = event_tx
            .send(BotEvent::Error {
                bot_id,
                generation,
                message: format!("connection refused by {} (simulated)", spec.server),
            })
            .await;
        return;
    }

    {
        let mut guard = sessions.lock();
        match guard.get_mut(&session_id) {
            Some(session) => session.connected = true,
            None => return,
        }
    }

    let greeting = BotEvent::Log {
        bot_id: bot_id.clone(),
        generation,
        line: format!("{} joined {}", spec.username, spec.server),
    };
    if event_tx
        .send(BotEvent::Connected {
            bot_id: bot_id.clone(),
            generation,
        })
        .await
        .is_err()
        || event_tx.send(greeting).await.is_err()
    {
        return;
    }

    let min = Duration::from_millis(1);
    let mut activity = tokio::time::interval(config.activity_interval.max(min));
    let mut anti_afk = tokio::time::interval(config.anti_afk_interval.max(min));
    // Both intervals fire immediately on first tick
    activity.tick().await;
    anti_afk.tick().await;

    loop {
        tokio::select! {
            _ = activity.tick() => {
                if roll(config.drop_rate) {
                    sessions.lock().remove(&session_id);
                    let _ = event_tx
                        .send(BotEvent::Disconnected {
                            bot_id: bot_id.clone(),
                            generation,
                            reason: "connection reset (simulated)".to_string(),
                        })
                        .await;
                    return;
                }
            }
            _ = anti_afk.tick(), if spec.anti_afk => {
                let event = BotEvent::Log {
                    bot_id: bot_id.clone(),
                    generation,
                    line: "anti-afk: jumped".to_string(),
                };
                if event_tx.send(event).await.is_err() {
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl<G: IdGen + 'static> ConnectionAdapter for SimulatedAdapter<G> {
    async fn connect(
        &self,
        spec: ConnectSpec,
        event_tx: mpsc::Sender<BotEvent>,
    ) -> Result<ConnectionHandle, ConnectionError> {
        if spec.server.host.trim().is_empty() {
            return Err(ConnectionError::ConnectFailed(
                "server host is empty".to_string(),
            ));
        }

        let session_id = self.id_gen.next();
        let handle = ConnectionHandle::new(spec.bot_id.clone(), spec.generation, &session_id);

        self.sessions.lock().insert(
            session_id.clone(),
            SimSession {
                spec: spec.clone(),
                connected: false,
                position: spawn_position(),
                health: 20,
                food: 20,
                event_tx: event_tx.clone(),
                task: None,
            },
        );
        let task = tokio::spawn(run_session(
            Arc::clone(&self.sessions),
            session_id.clone(),
            spec,
            self.config.clone(),
            event_tx,
        ));

        // Disconnect may have raced the spawn
        match self.sessions.lock().get_mut(&session_id) {
            Some(session) => session.task = Some(task),
            None => task.abort(),
        }

        Ok(handle)
    }

    async fn send(
        &self,
        handle: &ConnectionHandle,
        command: &Command,
    ) -> Result<CommandReply, ConnectionError> {
        let (reply, echo) = {
            let mut sessions = self.sessions.lock();
            let session = sessions
                .get_mut(&handle.session_id)
                .ok_or_else(|| ConnectionError::NotFound(handle.session_id.clone()))?;
            if !session.connected {
                return Err(ConnectionError::NotReady(handle.session_id.clone()));
            }

            let mut echo = None;
            let reply = match command {
                Command::Chat { message } => {
                    let line = format!("<{}> {}", session.spec.username, message);
                    echo = Some((
                        session.event_tx.clone(),
                        BotEvent::Log {
                            bot_id: handle.bot_id.clone(),
                            generation: handle.generation,
                            line: line.clone(),
                        },
                    ));
                    CommandReply::new("Message sent").with_data(json!({ "chat": line }))
                }
                Command::Move {
                    direction,
                    duration_ms,
                } => {
                    let distance = WALK_SPEED * (*duration_ms as f64) / 1000.0;
                    let p = &mut session.position;
                    match direction {
                        Direction::Forward => p.z -= distance,
                        Direction::Back => p.z += distance,
                        Direction::Left => p.x -= distance,
                        Direction::Right => p.x += distance,
                    }
                    CommandReply::new(format!("Moved {direction} for {duration_ms}ms"))
                        .with_data(json!({ "x": p.x, "y": p.y, "z": p.z }))
                }
                Command::Jump => CommandReply::new("Jumped"),
                Command::Status => {
                    let p = session.position;
                    CommandReply::new("Status").with_data(json!({
                        "username": session.spec.username,
                        "server": session.spec.server.to_string(),
                        "version": session.spec.version,
                        "position": { "x": p.x, "y": p.y, "z": p.z },
                        "health": session.health,
                        "food": session.food,
                    }))
                }
            };
            (reply, echo)
        };

        if let Some((tx, event)) = echo {
            let _ = tx.send(event).await;
        }
        Ok(reply)
    }

    async fn disconnect(&self, handle: &ConnectionHandle) -> Result<(), ConnectionError> {
        let session = self.sessions.lock().remove(&handle.session_id);
        match session {
            Some(session) => {
                if let Some(task) = session.task {
                    task.abort();
                }
                Ok(())
            }
            None => Err(ConnectionError::NotFound(handle.session_id.clone())),
        }
    }
}

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod tests;
