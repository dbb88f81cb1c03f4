//! Per-connection handler: decode, dispatch, reply.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive an envelope → decode it
//!   2. Dispatch the request to the gateway, using the connection's binding
//!   3. Reply with the same `seq`
//!
//! A connection starts unbound. `CreateSession`, `JoinSession`, and
//! `Resume` bind it to a (session, player) pair; every later request acts
//! as that player. Refused requests get an `Error` reply and the loop
//! carries on.

use std::sync::Arc;

use huehint_game::GRID_SIZE;
use huehint_protocol::{
    Codec, Envelope, ErrorCode, ErrorReply, Payload, PlayerId, ProtocolError, Request, Response,
    SessionCode,
};
use huehint_session::SessionError;

use crate::HuehintError;
use crate::gateway::SessionGateway;
use crate::server::ServerState;
use crate::transport::WsConnection;

/// Sequence number used when a frame is too broken to read one from.
const UNKNOWN_SEQ: u64 = 0;

/// The session and player a connection acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) code: SessionCode,
    pub(crate) player_id: PlayerId,
}

impl Binding {
    fn new(code: &SessionCode, player_id: &PlayerId) -> Self {
        Self {
            code: code.clone(),
            player_id: player_id.clone(),
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    mut conn: WsConnection,
    state: Arc<ServerState>,
) -> Result<(), HuehintError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let mut binding: Option<Binding> = None;

    loop {
        let data = match tokio::time::timeout(state.config.connection_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, "connection timed out");
                let _ = conn.close().await;
                break;
            }
        };

        let reply = match state.codec.decode::<Envelope>(&data) {
            Ok(Envelope {
                seq,
                payload: Payload::Request(request),
            }) => {
                let kind = request.kind();
                let outcome = dispatch(&state.gateway, &mut binding, request).await;
                if let Err(err) = &outcome {
                    tracing::debug!(%conn_id, seq, kind, code = %err.code, "request refused");
                }
                Envelope::reply(seq, outcome)
            }
            Ok(Envelope { seq, .. }) => {
                let err = ProtocolError::InvalidMessage("clients may only send requests".into());
                tracing::debug!(%conn_id, seq, error = %err, "non-request payload");
                Envelope::reply(seq, Err(ErrorReply::new(ErrorCode::BadRequest, err.to_string())))
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode envelope");
                Envelope::reply(
                    UNKNOWN_SEQ,
                    Err(ErrorReply::new(ErrorCode::BadRequest, e.to_string())),
                )
            }
        };

        let text = state.codec.encode_text(&reply)?;
        conn.send_text(text).await?;
    }

    if let Some(Binding { code, player_id }) = binding {
        tracing::debug!(%conn_id, %code, %player_id, "connection released");
    }
    Ok(())
}

/// Why a request could not be served.
#[derive(Debug, thiserror::Error)]
enum DispatchError {
    /// The request needs a bound player and the connection has none.
    #[error("create or join a session first")]
    Unbound,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl DispatchError {
    fn into_reply(self) -> ErrorReply {
        let code = match &self {
            Self::Unbound => ErrorCode::SessionNotFound,
            Self::Session(err) => err.code(),
        };
        ErrorReply::new(code, self.to_string())
    }
}

/// Runs one request against the gateway.
///
/// Updates `binding` when the request creates, joins, or resumes a session.
/// A failed request leaves it as it was.
pub(crate) async fn dispatch(
    gateway: &SessionGateway,
    binding: &mut Option<Binding>,
    request: Request,
) -> Result<Response, ErrorReply> {
    run(gateway, binding, request)
        .await
        .map_err(DispatchError::into_reply)
}

async fn run(
    gateway: &SessionGateway,
    binding: &mut Option<Binding>,
    request: Request,
) -> Result<Response, DispatchError> {
    let response = match request {
        Request::CreateSession { mode, host_name } => {
            let (code, player_id) = gateway.create_session(mode, host_name.as_deref()).await;
            *binding = Some(Binding::new(&code, &player_id));
            Response::SessionCreated { code, player_id }
        }
        Request::JoinSession { code, name, device } => {
            let player_id = gateway.join_session(&code, &name, device).await?;
            *binding = Some(Binding::new(&code, &player_id));
            Response::SessionJoined { code, player_id }
        }
        Request::Resume { code, player_id } => {
            let status = gateway.resume(&code, &player_id).await?;
            *binding = Some(Binding::new(&code, &player_id));
            Response::Resumed {
                code,
                player_id,
                status,
            }
        }
        Request::ListPlayers => {
            let b = bound(binding)?;
            Response::Players {
                players: gateway.list_players(&b.code).await?,
            }
        }
        Request::StartRound => {
            let b = bound(binding)?;
            Response::RoundStarted(gateway.start_round(&b.code, &b.player_id).await?)
        }
        Request::SubmitHint {
            short_hint,
            long_hint,
        } => {
            let b = bound(binding)?;
            gateway
                .submit_hint(&b.code, &b.player_id, &short_hint, &long_hint)
                .await?;
            Response::HintAccepted
        }
        Request::CurrentAttempt => {
            let b = bound(binding)?;
            Response::Attempt {
                attempt: gateway.current_attempt(&b.code, &b.player_id).await?,
                grid_size: GRID_SIZE,
            }
        }
        Request::SubmitMove { row, col } => {
            let b = bound(binding)?;
            let mv = gateway.submit_move(&b.code, &b.player_id, row, col).await?;
            Response::MoveScored {
                attempt: mv.attempt_number,
                score: mv.score,
                distance: mv.distance,
            }
        }
        Request::RoundStatus => {
            let b = bound(binding)?;
            Response::RoundStatus(gateway.round_status(&b.code, &b.player_id).await?)
        }
        Request::RoundSummary => {
            let b = bound(binding)?;
            Response::RoundSummary(gateway.round_summary(&b.code).await?)
        }
        Request::NextRound => {
            let b = bound(binding)?;
            Response::RoundAdvanced {
                round_number: gateway.next_round(&b.code, &b.player_id).await?,
            }
        }
        Request::Board => {
            let b = bound(binding)?;
            Response::Board(gateway.board(&b.code).await?)
        }
    };
    Ok(response)
}

fn bound(binding: &Option<Binding>) -> Result<&Binding, DispatchError> {
    binding.as_ref().ok_or(DispatchError::Unbound)
}

#[cfg(test)]
mod tests {
    use huehint_protocol::{Device, Mode, RedirectRole};
    use huehint_session::StoreConfig;

    use super::*;

    fn gateway() -> SessionGateway {
        SessionGateway::new(StoreConfig {
            rng_seed: Some(8),
            ..StoreConfig::default()
        })
    }

    #[tokio::test]
    async fn test_dispatch_unbound_request_returns_session_not_found() {
        let gw = gateway();
        let mut binding = None;

        let err = dispatch(&gw, &mut binding, Request::ListPlayers)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert!(binding.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_create_session_binds_connection() {
        let gw = gateway();
        let mut binding = None;

        let response = dispatch(
            &gw,
            &mut binding,
            Request::CreateSession {
                mode: Mode::Local,
                host_name: Some("Ana".into()),
            },
        )
        .await
        .unwrap();

        let Response::SessionCreated { code, player_id } = response else {
            panic!("expected SessionCreated, got {response:?}");
        };
        assert_eq!(binding, Some(Binding { code, player_id }));

        let start = dispatch(&gw, &mut binding, Request::StartRound)
            .await
            .unwrap();
        assert!(matches!(
            start,
            Response::RoundStarted(huehint_protocol::RoundStart {
                redirect: RedirectRole::SubmitHint,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_dispatch_failed_join_keeps_previous_binding() {
        let gw = gateway();
        let (code, host) = gw.create_session(Mode::Local, None).await;
        let mut binding = Some(Binding {
            code: code.clone(),
            player_id: host.clone(),
        });

        let err = dispatch(
            &gw,
            &mut binding,
            Request::JoinSession {
                code: SessionCode::new("NOSUCH"),
                name: "Beto".into(),
                device: Device::Mobile,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert_eq!(
            binding,
            Some(Binding {
                code,
                player_id: host
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_move_in_lobby_returns_round_not_found() {
        let gw = gateway();
        let (code, _host) = gw.create_session(Mode::Local, None).await;
        let beto = gw
            .join_session(&code, "Beto", Device::Mobile)
            .await
            .unwrap();
        let mut binding = Some(Binding {
            code,
            player_id: beto,
        });

        let err = dispatch(&gw, &mut binding, Request::SubmitMove { row: 1, col: 1 })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoundNotFound);
    }
}
