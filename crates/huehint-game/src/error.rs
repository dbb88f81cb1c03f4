//! Error types for the game rules.

use huehint_protocol::{ErrorCode, PlayerId};

/// A request the game rules refused.
///
/// Every variant is a validation failure: the session is left untouched
/// and the caller may simply try again with different input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The session has no current round (still in the lobby).
    #[error("no round has started yet")]
    RoundNotFound,

    /// Only the host may start the first round.
    #[error("only the host can start the game")]
    NotHost,

    /// Only this round's explainer may do that.
    #[error("only the explainer can do that")]
    NotExplainer,

    /// The explainer cannot guess their own target.
    #[error("the explainer cannot guess")]
    IsExplainer,

    /// A hint failed validation.
    #[error("invalid hint: {0}")]
    InvalidHint(&'static str),

    /// A guess fell outside the grid.
    #[error("coordinates ({row}, {col}) are off the grid")]
    InvalidCoordinates { row: i32, col: i32 },

    /// The player has no attempt left, or the hint it needs isn't in yet.
    #[error("no attempt available")]
    NoAttemptAvailable,

    /// The player handle doesn't belong to this session.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// A joining player gave a blank name.
    #[error("name must not be empty")]
    InvalidName,

    /// Results were requested before every guesser finished.
    #[error("round {0} is still in progress")]
    RoundInProgress(u32),
}

impl GameError {
    /// The wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RoundNotFound => ErrorCode::RoundNotFound,
            Self::NotHost => ErrorCode::NotHost,
            Self::NotExplainer => ErrorCode::NotExplainer,
            Self::IsExplainer => ErrorCode::IsExplainer,
            Self::InvalidHint(_) => ErrorCode::InvalidHint,
            Self::InvalidCoordinates { .. } => ErrorCode::InvalidCoordinates,
            Self::NoAttemptAvailable => ErrorCode::NoAttemptAvailable,
            Self::PlayerNotFound(_) => ErrorCode::PlayerNotFound,
            Self::InvalidName => ErrorCode::InvalidName,
            Self::RoundInProgress(_) => ErrorCode::RoundInProgress,
        }
    }
}
