//! Identity types and shared enums that appear on the wire.
//!
//! These are used by every layer above the protocol: the game rules store
//! them inside entities, the session store keys its table by
//! [`SessionCode`], and the server echoes them back to clients.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque handle identifying a player inside one session.
///
/// Assigned when the player creates or joins a session and stable for as
/// long as the client keeps it. The server never interprets the contents;
/// it only compares handles for equality.
///
/// `#[serde(transparent)]` keeps the JSON form a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps a raw handle.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrows the raw handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Characters a session code may contain.
pub const SESSION_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Shortest session code the store generates.
pub const SESSION_CODE_MIN_LEN: usize = 6;

/// Longest session code the store generates.
pub const SESSION_CODE_MAX_LEN: usize = 8;

/// The short code players type to join a session.
///
/// Codes are 6–8 uppercase alphanumeric characters. User input is trimmed
/// and upper-cased on construction so `" ab12cd "` finds session `AB12CD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Normalizes user input into a code.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_uppercase())
    }

    /// Borrows the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the code has the shape the store generates.
    ///
    /// Lookups do not require this; an ill-formed code simply isn't found.
    pub fn is_well_formed(&self) -> bool {
        (SESSION_CODE_MIN_LEN..=SESSION_CODE_MAX_LEN).contains(&self.0.len())
            && self.0.bytes().all(|b| SESSION_CODE_ALPHABET.contains(&b))
    }
}

impl From<String> for SessionCode {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Session-level enums
// ---------------------------------------------------------------------------

/// Whether the session is played around one screen or across devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Local,
    Remote,
}

/// The kind of device a player joined from. Presentational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Tv,
    #[default]
    Mobile,
    Desktop,
}

/// Lifecycle status of a session.
///
/// ```text
/// Lobby ──(first StartRound)──→ InGame ──(StartRound / NextRound)──→ InGame
/// ```
///
/// There is no terminal state yet; the enum is `#[non_exhaustive]` so one
/// can be added without breaking matchers in other crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionStatus {
    #[default]
    Lobby,
    InGame,
}

impl SessionStatus {
    /// Returns `true` once the first round has started.
    pub fn is_in_game(&self) -> bool {
        matches!(self, Self::InGame)
    }
}

// ---------------------------------------------------------------------------
// Round-level enums
// ---------------------------------------------------------------------------

/// A cell on the 5×5 grid, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u8,
    pub col: u8,
}

impl GridPosition {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// What a player should be doing in the current round, as seen by a
/// polling client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The player gives hints this round.
    Explainer,
    /// Nothing to do right now (hints pending or attempts used up).
    Waiting,
    /// The player has an attempt available.
    Guessing,
}

/// Which screen a client should move to after starting a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectRole {
    /// The explainer goes to the hint form.
    SubmitHint,
    /// The host's shared screen shows the board.
    Board,
    /// Everyone else waits for hints.
    WaitingHint,
}
