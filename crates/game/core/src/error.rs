//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`StoreError`, `MoveError`, `InventoryError`,
//! `EngineError`) live next to the code that raises them and implement
//! [`GameError`] so hosts can classify them uniformly.
//!
//! No error in the kernel is fatal: every failure either degrades to a no-op
//! or is reported to the player as a message while the tick driver keeps
//! waiting for input.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative action.
    ///
    /// Examples: destination blocked, inventory full
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: destroyed entity, slot index out of range
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    ///
    /// Examples: occupancy index out of sync with positions
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
