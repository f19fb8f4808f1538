//! Errors surfaced by the tick driver.

use crate::ecs::{EntityId, StoreError};
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no intent is expected right now")]
    NotAwaitingIntent,

    #[error("the game is already over")]
    Finished,

    #[error("player entity {0} is missing from the world")]
    PlayerMissing(EntityId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAwaitingIntent | Self::Finished => ErrorSeverity::Validation,
            Self::PlayerMissing(_) | Self::Store(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAwaitingIntent => "ENGINE_NOT_AWAITING_INTENT",
            Self::Finished => "ENGINE_FINISHED",
            Self::PlayerMissing(_) => "ENGINE_PLAYER_MISSING",
            Self::Store(_) => "ENGINE_STORE",
        }
    }
}
