use crate::types::GamePhase;

/// Errors returned by game commands. A failing command leaves state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot {action} while in {phase:?} phase")]
    InvalidPhase {
        action: &'static str,
        phase: GamePhase,
    },
}

impl GameError {
    /// Stable code sent to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidPhase { .. } => "INVALID_PHASE",
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
