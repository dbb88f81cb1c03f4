//! Request/response messages exchanged between clients and the gateway.
//!
//! Every frame on the wire is an [`Envelope`]. Clients send
//! `Payload::Request`; the server answers each one with exactly one
//! `Payload::Response` or `Payload::Error` carrying the same `seq`.
//!
//! ```text
//! { "seq": 4, "payload": { "type": "Request", "data": { "type": "SubmitMove", "row": 2, "col": 3 } } }
//! { "seq": 4, "payload": { "type": "Response", "data": { "type": "MoveScored", "attempt": 1, "score": 3, "distance": 1 } } }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Device, GridPosition, Mode, PlayerId, RedirectRole, Role, SessionCode, SessionStatus};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Everything a client can ask the gateway to do.
///
/// Only `CreateSession`, `JoinSession`, and `Resume` name a session
/// explicitly. The rest act on the session and player the connection is
/// bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Open a new session with the caller as host.
    CreateSession {
        #[serde(default)]
        mode: Mode,
        #[serde(default)]
        host_name: Option<String>,
    },

    /// Join an existing session by code.
    JoinSession {
        code: SessionCode,
        name: String,
        #[serde(default)]
        device: Device,
    },

    /// Rebind this connection to a player handle obtained earlier.
    Resume { code: SessionCode, player_id: PlayerId },

    ListPlayers,

    /// Host starts the first round; afterwards this just reports the
    /// current round and where the caller should go.
    StartRound,

    SubmitHint { short_hint: String, long_hint: String },

    /// Which attempt the caller may submit next.
    CurrentAttempt,

    SubmitMove { row: i32, col: i32 },

    /// Poll the caller's role and whether the round is over.
    RoundStatus,

    RoundSummary,

    /// Explainer moves the session to the next round.
    NextRound,

    /// Shared-screen view of the grid, players, and current round.
    Board,
}

impl Request {
    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateSession { .. } => "create_session",
            Self::JoinSession { .. } => "join_session",
            Self::Resume { .. } => "resume",
            Self::ListPlayers => "list_players",
            Self::StartRound => "start_round",
            Self::SubmitHint { .. } => "submit_hint",
            Self::CurrentAttempt => "current_attempt",
            Self::SubmitMove { .. } => "submit_move",
            Self::RoundStatus => "round_status",
            Self::RoundSummary => "round_summary",
            Self::NextRound => "next_round",
            Self::Board => "board",
        }
    }
}

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// A player as shown in the lobby and on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    pub is_host: bool,
    pub points: u32,
}

/// The result of starting (or re-entering) a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStart {
    pub round_number: u32,
    pub explainer_id: PlayerId,
    pub redirect: RedirectRole,
}

/// Poll result for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStatusView {
    pub round_number: u32,
    pub role: Role,
    pub round_over: bool,
}

/// One row of the round results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub name: String,
    /// Sum of this player's move scores in the round. Always 0 for the
    /// explainer, whose bonus only shows up in `total_score`.
    pub round_score: u32,
    /// The player's cumulative points, which only explainer bonuses add to.
    pub total_score: u32,
}

/// Results of a round: the hidden target, the hints, and everyone's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummaryView {
    pub round_number: u32,
    pub target_cell: String,
    pub target_color: String,
    pub target_position: GridPosition,
    pub short_hint: String,
    pub long_hint: String,
    pub players: Vec<PlayerScore>,
}

/// One cell of the color grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCellView {
    pub key: String,
    pub color: String,
    pub position: GridPosition,
}

/// Current round as displayed on the shared board. The target stays hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRound {
    pub round_number: u32,
    pub explainer_name: String,
    pub short_hint: String,
    pub long_hint: String,
    pub moves_recorded: usize,
    pub round_over: bool,
}

/// Shared-screen snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub code: SessionCode,
    pub status: SessionStatus,
    pub grid_size: u8,
    pub cells: Vec<GridCellView>,
    pub players: Vec<PlayerEntry>,
    pub round: Option<BoardRound>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Successful replies, one variant per request kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    SessionCreated { code: SessionCode, player_id: PlayerId },
    SessionJoined { code: SessionCode, player_id: PlayerId },
    Resumed { code: SessionCode, player_id: PlayerId, status: SessionStatus },
    Players { players: Vec<PlayerEntry> },
    RoundStarted(RoundStart),
    HintAccepted,
    Attempt { attempt: u8, grid_size: u8 },
    MoveScored { attempt: u8, score: u32, distance: u8 },
    RoundStatus(RoundStatusView),
    RoundSummary(RoundSummaryView),
    RoundAdvanced { round_number: u32 },
    Board(BoardView),
}

// ---------------------------------------------------------------------------
// Errors on the wire
// ---------------------------------------------------------------------------

/// Stable machine-readable error codes. Clients branch on these; the
/// accompanying message is for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    SessionNotFound,
    SessionUnavailable,
    RoundNotFound,
    RoundInProgress,
    PlayerNotFound,
    NotHost,
    NotExplainer,
    IsExplainer,
    InvalidHint,
    InvalidName,
    InvalidCoordinates,
    NoAttemptAvailable,
    BadRequest,
}

impl ErrorCode {
    /// The snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionNotFound => "session_not_found",
            Self::SessionUnavailable => "session_unavailable",
            Self::RoundNotFound => "round_not_found",
            Self::RoundInProgress => "round_in_progress",
            Self::PlayerNotFound => "player_not_found",
            Self::NotHost => "not_host",
            Self::NotExplainer => "not_explainer",
            Self::IsExplainer => "is_explainer",
            Self::InvalidHint => "invalid_hint",
            Self::InvalidName => "invalid_name",
            Self::InvalidCoordinates => "invalid_coordinates",
            Self::NoAttemptAvailable => "no_attempt_available",
            Self::BadRequest => "bad_request",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an error reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReply {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// What's inside an envelope.
///
/// Adjacently tagged: `{ "type": "Request", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    Request(Request),
    Response(Response),
    Error(ErrorReply),
}

/// The top-level frame. `seq` is chosen by the client and echoed back so
/// it can pair replies with requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub seq: u64,
    pub payload: Payload,
}

impl Envelope {
    /// Builds the reply envelope for request `seq`.
    pub fn reply(seq: u64, outcome: Result<Response, ErrorReply>) -> Self {
        let payload = match outcome {
            Ok(response) => Payload::Response(response),
            Err(error) => Payload::Error(error),
        };
        Self { seq, payload }
    }
}
