//! Replays a fixed list of intents.

use std::collections::VecDeque;

use async_trait::async_trait;
use game_core::Intent;
use tokio::sync::Mutex;

use crate::api::{IntentProvider, Result, TurnContext};

/// Hands out queued intents in order, then waits forever.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Intent>>,
}

impl ScriptedProvider {
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            script: Mutex::new(intents.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl IntentProvider for ScriptedProvider {
    async fn provide_intent(&self, _ctx: &TurnContext<'_>) -> Result<Intent> {
        Ok(self.script.lock().await.pop_front().unwrap_or(Intent::Wait))
    }
}
