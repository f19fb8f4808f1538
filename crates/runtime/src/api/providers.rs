//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`IntentProvider`] implementations so the simulation
//! can run with human input, scripted fixtures, or an autopilot.
use async_trait::async_trait;
use game_core::{Dungeon, EntityId, GameStats, Intent, World};

use super::errors::Result;

/// Read-only view of the session handed to a provider on the player's turn.
#[derive(Clone, Copy, Debug)]
pub struct TurnContext<'a> {
    pub world: &'a World,
    pub dungeon: &'a Dungeon,
    pub player: EntityId,
    pub stats: &'a GameStats,
}

/// Source of player intents.
///
/// Called once per player decision. The returned intent may be rejected by
/// the engine (for example a move into a wall); the provider is then asked
/// again with the same context.
#[async_trait]
pub trait IntentProvider: Send + Sync {
    async fn provide_intent(&self, ctx: &TurnContext<'_>) -> Result<Intent>;
}

/// A provider that always waits. Useful for testing or as a fallback.
pub struct WaitIntentProvider;

#[async_trait]
impl IntentProvider for WaitIntentProvider {
    async fn provide_intent(&self, _ctx: &TurnContext<'_>) -> Result<Intent> {
        Ok(Intent::Wait)
    }
}
