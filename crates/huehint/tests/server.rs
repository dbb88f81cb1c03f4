//! Integration tests for the Huehint server over real WebSocket connections.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use huehint::prelude::*;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server() -> String {
    let config = ServerConfig {
        store: StoreConfig {
            rng_seed: Some(99),
            ..StoreConfig::default()
        },
        ..ServerConfig::default()
    };
    let server = HuehintServerBuilder::new()
        .config(config)
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn recv_envelope(ws: &mut ClientWs) -> Envelope {
    let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("reply in time")
        .expect("stream open")
        .expect("recv");
    serde_json::from_slice(&msg.into_data()).expect("decode")
}

/// Sends a request and returns the reply envelope.
async fn call(ws: &mut ClientWs, seq: u64, request: Request) -> Envelope {
    let envelope = Envelope {
        seq,
        payload: Payload::Request(request),
    };
    let text = serde_json::to_string(&envelope).expect("encode");
    ws.send(Message::Text(text.into())).await.expect("send");
    recv_envelope(ws).await
}

async fn ok(ws: &mut ClientWs, request: Request) -> Response {
    match call(ws, 1, request).await.payload {
        Payload::Response(response) => response,
        other => panic!("expected Response, got {other:?}"),
    }
}

async fn refused(ws: &mut ClientWs, request: Request) -> ErrorReply {
    match call(ws, 1, request).await.payload {
        Payload::Error(reply) => reply,
        other => panic!("expected Error, got {other:?}"),
    }
}

async fn create(ws: &mut ClientWs, host_name: &str) -> (SessionCode, PlayerId) {
    match ok(
        ws,
        Request::CreateSession {
            mode: Mode::Local,
            host_name: Some(host_name.into()),
        },
    )
    .await
    {
        Response::SessionCreated { code, player_id } => (code, player_id),
        other => panic!("expected SessionCreated, got {other:?}"),
    }
}

async fn join(ws: &mut ClientWs, code: &SessionCode, name: &str) -> PlayerId {
    match ok(
        ws,
        Request::JoinSession {
            code: code.clone(),
            name: name.into(),
            device: Device::Mobile,
        },
    )
    .await
    {
        Response::SessionJoined { player_id, .. } => player_id,
        other => panic!("expected SessionJoined, got {other:?}"),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_full_round_over_websocket() {
    let addr = start_server().await;
    let mut host = connect(&addr).await;
    let mut guest = connect(&addr).await;

    let (code, ana) = create(&mut host, "Ana").await;
    assert!(code.is_well_formed());
    let beto = join(&mut guest, &code, "Beto").await;
    assert_ne!(ana, beto);

    let Response::RoundStarted(start) = ok(&mut host, Request::StartRound).await else {
        panic!("expected RoundStarted");
    };
    assert_eq!(start.round_number, 1);
    assert_eq!(start.explainer_id, ana);
    assert_eq!(start.redirect, RedirectRole::SubmitHint);

    let Response::RoundStarted(joined) = ok(&mut guest, Request::StartRound).await else {
        panic!("expected RoundStarted");
    };
    assert_eq!(joined.redirect, RedirectRole::WaitingHint);

    let hint = Request::SubmitHint {
        short_hint: "sky".into(),
        long_hint: "a clear afternoon".into(),
    };
    assert_eq!(ok(&mut host, hint).await, Response::HintAccepted);

    assert_eq!(
        ok(&mut guest, Request::CurrentAttempt).await,
        Response::Attempt {
            attempt: 1,
            grid_size: 5
        }
    );
    let Response::MoveScored { attempt, score: first, .. } =
        ok(&mut guest, Request::SubmitMove { row: 0, col: 0 }).await
    else {
        panic!("expected MoveScored");
    };
    assert_eq!(attempt, 1);

    let err = refused(&mut host, Request::RoundSummary).await;
    assert_eq!(err.code, ErrorCode::RoundInProgress);

    let Response::MoveScored { attempt, score: second, .. } =
        ok(&mut guest, Request::SubmitMove { row: 4, col: 4 }).await
    else {
        panic!("expected MoveScored");
    };
    assert_eq!(attempt, 2);

    let Response::RoundSummary(summary) = ok(&mut host, Request::RoundSummary).await else {
        panic!("expected RoundSummary");
    };
    assert_eq!(summary.short_hint, "sky");
    assert_eq!(summary.players.len(), 2);
    let ana_score = summary.players.iter().find(|p| p.name == "Ana").unwrap();
    let beto_score = summary.players.iter().find(|p| p.name == "Beto").unwrap();
    assert_eq!(beto_score.round_score, first + second);
    assert_eq!(beto_score.total_score, 0);
    assert_eq!(ana_score.round_score, 0);
    assert_eq!(
        ana_score.total_score,
        first.saturating_sub(1) + second.saturating_sub(1)
    );

    assert_eq!(
        ok(&mut host, Request::NextRound).await,
        Response::RoundAdvanced { round_number: 2 }
    );
    let Response::RoundStatus(status) = ok(&mut guest, Request::RoundStatus).await else {
        panic!("expected RoundStatus");
    };
    assert_eq!(status.round_number, 2);
    assert_eq!(status.role, Role::Explainer);
}

#[tokio::test]
async fn test_request_before_binding_returns_session_not_found() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    let err = refused(&mut ws, Request::ListPlayers).await;
    assert_eq!(err.code, ErrorCode::SessionNotFound);

    // Connection stays usable after a refusal.
    let (code, _) = create(&mut ws, "Ana").await;
    let Response::Players { players } = ok(&mut ws, Request::ListPlayers).await else {
        panic!("expected Players");
    };
    assert_eq!(players.len(), 1);
    assert!(players[0].is_host);
    assert!(code.is_well_formed());
}

#[tokio::test]
async fn test_garbage_frame_returns_bad_request_with_seq_zero() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Text("not json".into())).await.unwrap();
    let reply = recv_envelope(&mut ws).await;

    assert_eq!(reply.seq, 0);
    match reply.payload {
        Payload::Error(err) => assert_eq!(err.code, ErrorCode::BadRequest),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reply_echoes_request_seq() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Text(
        r#"{"seq":41,"payload":{"type":"Request","data":{"type":"CreateSession","mode":"remote"}}}"#
            .into(),
    ))
    .await
    .unwrap();
    let reply = recv_envelope(&mut ws).await;
    assert_eq!(reply.seq, 41);
    assert!(matches!(
        reply.payload,
        Payload::Response(Response::SessionCreated { .. })
    ));

    let reply = call(&mut ws, 42, Request::Board).await;
    assert_eq!(reply.seq, 42);
    let Payload::Response(Response::Board(board)) = reply.payload else {
        panic!("expected Board");
    };
    assert_eq!(board.status, SessionStatus::Lobby);
    assert_eq!(board.cells.len(), 25);
    assert!(board.round.is_none());
}

#[tokio::test]
async fn test_response_from_client_is_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    let envelope = Envelope {
        seq: 5,
        payload: Payload::Response(Response::HintAccepted),
    };
    ws.send(Message::Text(serde_json::to_string(&envelope).unwrap().into()))
        .await
        .unwrap();
    let reply = recv_envelope(&mut ws).await;

    assert_eq!(reply.seq, 5);
    let err = match reply.payload {
        Payload::Error(err) => err,
        other => panic!("expected Error, got {other:?}"),
    };
    assert_eq!(err.code, ErrorCode::BadRequest);
    assert!(err.message.starts_with("invalid message"));
}

#[tokio::test]
async fn test_resume_on_new_connection_restores_player() {
    let addr = start_server().await;
    let mut host = connect(&addr).await;
    let (code, _ana) = create(&mut host, "Ana").await;
    let mut guest = connect(&addr).await;
    let beto = join(&mut guest, &code, "Beto").await;
    drop(guest);

    ok(&mut host, Request::StartRound).await;

    let mut again = connect(&addr).await;
    let err = refused(
        &mut again,
        Request::Resume {
            code: code.clone(),
            player_id: PlayerId::new("nobody"),
        },
    )
    .await;
    assert_eq!(err.code, ErrorCode::PlayerNotFound);

    assert_eq!(
        ok(
            &mut again,
            Request::Resume {
                code: code.clone(),
                player_id: beto.clone(),
            },
        )
        .await,
        Response::Resumed {
            code,
            player_id: beto,
            status: SessionStatus::InGame,
        }
    );

    // Acting as Beto now: not the explainer, so no hint.
    let err = refused(
        &mut again,
        Request::SubmitHint {
            short_hint: "sky".into(),
            long_hint: "blue".into(),
        },
    )
    .await;
    assert_eq!(err.code, ErrorCode::NotExplainer);
}

#[tokio::test]
async fn test_multiple_sessions_are_independent() {
    let addr = start_server().await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;

    let (code_a, _) = create(&mut a, "Ana").await;
    let (code_b, _) = create(&mut b, "Bia").await;
    assert_ne!(code_a, code_b);

    join(&mut b, &code_a, "Bia").await;
    let Response::Players { players } = ok(&mut a, Request::ListPlayers).await else {
        panic!("expected Players");
    };
    assert_eq!(players.len(), 2);

    let mut c = connect(&addr).await;
    join(&mut c, &code_b, "Caio").await;
    let Response::Players { players } = ok(&mut c, Request::ListPlayers).await else {
        panic!("expected Players");
    };
    let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bia", "Caio"]);
}
