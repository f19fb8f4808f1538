//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine and from intent providers so clients can
//! bubble them up with consistent context.
use thiserror::Error;

use game_core::{EngineError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("player intent provider not set")]
    ProviderNotSet,

    #[error("intent provider failed: {0}")]
    Provider(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("session exceeded {limit} steps without finishing")]
    StepLimit { limit: u64 },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ProviderNotSet => ErrorSeverity::Validation,
            Self::Provider(_) | Self::StepLimit { .. } => ErrorSeverity::Recoverable,
            Self::Engine(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderNotSet => "RUNTIME_PROVIDER_NOT_SET",
            Self::Provider(_) => "RUNTIME_PROVIDER",
            Self::Engine(err) => err.error_code(),
            Self::StepLimit { .. } => "RUNTIME_STEP_LIMIT",
        }
    }
}
