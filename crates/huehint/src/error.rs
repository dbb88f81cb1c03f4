//! Unified error type for the Huehint server.

use huehint_protocol::ProtocolError;
use huehint_session::SessionError;

use crate::transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HuehintError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (not found, unavailable, rejected by the rules).
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use huehint_game::GameError;
    use huehint_protocol::SessionCode;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let huehint_err: HuehintError = TransportError::SendFailed(io).into();
        assert!(matches!(huehint_err, HuehintError::Transport(_)));
        assert!(huehint_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let huehint_err: HuehintError = err.into();
        assert!(matches!(huehint_err, HuehintError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::NotFound(SessionCode::new("ABCDEF"));
        let huehint_err: HuehintError = err.into();
        assert!(matches!(huehint_err, HuehintError::Session(_)));
    }

    #[test]
    fn test_from_game_error_through_session() {
        let err = SessionError::from(GameError::IsExplainer);
        let huehint_err: HuehintError = err.into();
        assert_eq!(huehint_err.to_string(), "the explainer cannot guess");
    }
}
