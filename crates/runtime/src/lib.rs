//! Runtime orchestration for the deterministic game simulation.
//!
//! This crate wraps [`game_core::GameEngine`] in an async session loop. The
//! engine suspends whenever the player must act; the runtime asks an
//! [`IntentProvider`] for the intent, narrates what happened and broadcasts
//! every event to subscribers.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session loop and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based broadcast of game and turn events
//! - [`narrator`] adds floor themes, warnings and the death report
//! - [`providers`] ships scripted and autopilot intent sources
pub mod api;
pub mod events;
pub mod narrator;
pub mod providers;
pub mod runtime;

pub use api::{IntentProvider, Result, RuntimeError, TurnContext, WaitIntentProvider};
pub use events::{Event, EventBus, Topic, TurnEvent};
pub use narrator::Narrator;
pub use providers::{AutoPilotProvider, ScriptedProvider};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, SessionSummary};
