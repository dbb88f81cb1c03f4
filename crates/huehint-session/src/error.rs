//! Error types for the session layer.

use huehint_game::GameError;
use huehint_protocol::{ErrorCode, SessionCode};

/// Errors from looking up or talking to a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session is stored under this code (never created, or evicted).
    #[error("session {0} not found")]
    NotFound(SessionCode),

    /// The session's actor stopped before answering.
    #[error("session {0} is unavailable")]
    Unavailable(SessionCode),

    /// The game rules refused the request.
    #[error(transparent)]
    Rejected(#[from] GameError),
}

impl SessionError {
    /// The wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::SessionNotFound,
            Self::Unavailable(_) => ErrorCode::SessionUnavailable,
            Self::Rejected(err) => err.code(),
        }
    }
}
