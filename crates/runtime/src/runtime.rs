//! High-level session orchestrator.
//!
//! The runtime owns the engine, the narrator and the event bus, and exposes a
//! builder-based API for clients to drive a session.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use game_content::DeathReport;
use game_core::{
    GameConfig, GameEngine, GameEvent, GameOutcome, GameOverReport, Intent, IntentOutcome,
    StepOutcome,
};

use crate::api::{IntentProvider, Result, RuntimeError, TurnContext};
use crate::events::{Event, EventBus, Topic, TurnEvent};
use crate::narrator::Narrator;

/// Rejected intents in a row before the runtime waits on the player's behalf.
const MAX_REJECTIONS: u32 = 8;

/// Runtime configuration shared across the orchestrator and its parts.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Session seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub event_buffer_size: usize,
    /// Scheduler steps allowed before the session is abandoned.
    pub max_steps: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            seed: None,
            event_buffer_size: 1024,
            max_steps: 5_000_000,
        }
    }
}

impl RuntimeConfig {
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Everything a client needs once the session is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub report: GameOverReport,
    /// Present when the player died.
    pub death: Option<DeathReport>,
}

impl SessionSummary {
    pub fn digest_hex(&self) -> String {
        hex::encode(self.report.digest)
    }
}

/// Main runtime that drives one game session.
pub struct Runtime {
    engine: GameEngine,
    narrator: Narrator,
    bus: EventBus,
    player_provider: Box<dyn IntentProvider>,
    seed: u64,
    steps: u64,
    max_steps: u64,
    rejections: u32,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Subscribe to one event topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Clone of the bus, for subscribing from other tasks.
    pub fn event_bus(&self) -> EventBus {
        self.bus.clone()
    }

    /// Set the player intent provider
    pub fn set_player_provider(&mut self, provider: impl IntentProvider + 'static) {
        self.player_provider = Box::new(provider);
    }

    /// Execute a single scheduler step, asking the provider if the player is up.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        if self.steps >= self.max_steps {
            return Err(RuntimeError::StepLimit {
                limit: self.max_steps,
            });
        }
        self.steps += 1;

        let outcome = self.engine.step();
        if let StepOutcome::NeedsIntent(_) = outcome {
            self.player_turn().await?;
        }
        self.flush_events();
        Ok(outcome)
    }

    /// Run the game loop until the session ends.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        loop {
            if let StepOutcome::Finished(outcome) = self.step().await? {
                return Ok(self.finish(outcome));
            }
        }
    }

    async fn player_turn(&mut self) -> Result<()> {
        let player = self.engine.player();
        let stats = self.engine.stats();
        self.bus.publish(Event::Turn(TurnEvent::PlayerTurn {
            floor: stats.floor,
            turn: stats.turns_survived,
        }));

        let intent = if self.rejections >= MAX_REJECTIONS {
            warn!(rejections = self.rejections, "provider keeps failing, waiting instead");
            Intent::Wait
        } else {
            let ctx = TurnContext {
                world: self.engine.world(),
                dungeon: self.engine.dungeon(),
                player,
                stats: self.engine.stats(),
            };
            self.player_provider.provide_intent(&ctx).await?
        };

        match self.engine.submit_intent(intent)? {
            IntentOutcome::Spent => {
                self.rejections = 0;
                self.flush_events();
                let lines = self
                    .narrator
                    .after_player_turn(self.engine.world(), player);
                for line in lines {
                    self.bus.publish(Event::Game(line));
                }
            }
            IntentOutcome::Rejected => {
                self.rejections += 1;
                debug!(?intent, rejections = self.rejections, "intent rejected");
            }
            IntentOutcome::Menu(menu) => {
                self.rejections += 1;
                self.bus.publish(Event::Turn(TurnEvent::MenuRequested(menu)));
            }
        }
        Ok(())
    }

    /// Moves engine events onto the bus, interleaving narration.
    fn flush_events(&mut self) {
        for event in self.engine.drain_events() {
            let narration = self.narrator.observe(&event);
            if let GameEvent::Message { text, .. } = &event {
                debug!(target: "dungeon::log", "{text}");
            }
            self.bus.publish(Event::Game(event));
            if let Some(line) = narration {
                self.bus.publish(Event::Game(line));
            }
        }
    }

    fn finish(&mut self, outcome: GameOutcome) -> SessionSummary {
        let death = match outcome {
            GameOutcome::Defeat => Some(self.narrator.death_report(self.engine.stats())),
            GameOutcome::Victory => None,
        };
        let summary = match self.engine.report() {
            Some(report) => SessionSummary {
                seed: self.seed,
                report,
                death,
            },
            None => SessionSummary {
                seed: self.seed,
                report: GameOverReport {
                    outcome,
                    stats: self.engine.stats().clone(),
                    digest: self.engine.state_digest(),
                },
                death,
            },
        };

        info!(
            seed = self.seed,
            outcome = ?summary.report.outcome,
            floor = summary.report.stats.floor,
            steps = self.steps,
            "session finished"
        );
        self.bus.publish(Event::Turn(TurnEvent::GameOver {
            report: summary.report.clone(),
            death: summary.death.clone(),
        }));
        summary
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    player_provider: Option<Box<dyn IntentProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            player_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the player intent provider (required)
    pub fn player_provider(mut self, provider: impl IntentProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and start the session on floor 1.
    pub fn build(self) -> Result<Runtime> {
        let player_provider = self.player_provider.ok_or(RuntimeError::ProviderNotSet)?;
        let seed = self.config.resolve_seed();
        let engine = GameEngine::new(self.config.game_config, seed)?;

        let mut runtime = Runtime {
            engine,
            narrator: Narrator::new(seed),
            bus: EventBus::with_capacity(self.config.event_buffer_size),
            player_provider,
            seed,
            steps: 0,
            max_steps: self.config.max_steps,
            rejections: 0,
        };
        runtime.flush_events();
        info!(seed, "runtime ready");
        Ok(runtime)
    }
}
