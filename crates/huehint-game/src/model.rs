//! Session, player, round, and move entities.
//!
//! A [`GameSession`] owns its players and rounds; a [`Round`] owns its
//! moves. Nothing here enforces the game rules beyond basic bookkeeping;
//! that is the job of [`crate::engine`].

use std::fmt::Write as _;

use huehint_protocol::{Device, GridPosition, Mode, PlayerId, SessionCode, SessionStatus};
use rand::Rng;
use serde::Serialize;

use crate::GameError;
use crate::grid::{GRID_SIZE, TargetCell};

/// Name given to a host who didn't type one.
pub const DEFAULT_HOST_NAME: &str = "Host";

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A participant in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub device: Device,
    pub is_host: bool,
    /// Explainer bonuses accumulated across all rounds.
    pub points: u32,
}

/// Generates an opaque player handle: 16 random bytes as lowercase hex.
pub fn generate_player_id<R: Rng + ?Sized>(rng: &mut R) -> PlayerId {
    let bytes: [u8; 16] = rng.random();
    let mut raw = String::with_capacity(32);
    for b in bytes {
        let _ = write!(raw, "{b:02x}");
    }
    PlayerId::new(raw)
}

// ---------------------------------------------------------------------------
// Move / Round
// ---------------------------------------------------------------------------

/// One recorded guess. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub player_id: PlayerId,
    /// 1 or 2.
    pub attempt_number: u8,
    pub guess: GridPosition,
    pub distance: u8,
    pub score: u32,
}

/// One explainer, one target, up to two guesses per other player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    pub round_number: u32,
    pub explainer_id: PlayerId,
    pub target: TargetCell,
    pub short_hint: Option<String>,
    pub long_hint: Option<String>,
    pub moves: Vec<Move>,
}

impl Round {
    pub fn new(round_number: u32, explainer_id: PlayerId, target: TargetCell) -> Self {
        Self {
            round_number,
            explainer_id,
            target,
            short_hint: None,
            long_hint: None,
            moves: Vec::new(),
        }
    }

    /// Moves recorded for one player, in submission order.
    pub fn moves_by<'a>(&'a self, player_id: &'a PlayerId) -> impl Iterator<Item = &'a Move> + 'a {
        self.moves.iter().filter(move |m| &m.player_id == player_id)
    }

    /// Whether `player_id` already used attempt `attempt_number`.
    pub fn has_attempt(&self, player_id: &PlayerId, attempt_number: u8) -> bool {
        self.moves_by(player_id)
            .any(|m| m.attempt_number == attempt_number)
    }

    pub fn is_explainer(&self, player_id: &PlayerId) -> bool {
        &self.explainer_id == player_id
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// All state for one game, keyed externally by its code.
///
/// `current_round_number` is `None` in the lobby and afterwards always
/// equals the last round's number; rounds are numbered `1..=N` with no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSession {
    pub code: SessionCode,
    pub mode: Mode,
    pub status: SessionStatus,
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    pub current_round_number: Option<u32>,
    pub grid_size: u8,
}

impl GameSession {
    /// Creates a session in the lobby with a single host player on the TV.
    ///
    /// A blank `host_name` falls back to [`DEFAULT_HOST_NAME`]. Returns the
    /// session and the host's handle.
    pub fn new<R: Rng + ?Sized>(
        code: SessionCode,
        mode: Mode,
        host_name: &str,
        rng: &mut R,
    ) -> (Self, PlayerId) {
        let name = match host_name.trim() {
            "" => DEFAULT_HOST_NAME,
            trimmed => trimmed,
        };
        let host_id = generate_player_id(rng);
        let host = Player {
            id: host_id.clone(),
            name: name.to_string(),
            device: Device::Tv,
            is_host: true,
            points: 0,
        };

        let session = Self {
            code,
            mode,
            status: SessionStatus::Lobby,
            players: vec![host],
            rounds: Vec::new(),
            current_round_number: None,
            grid_size: GRID_SIZE,
        };
        (session, host_id)
    }

    /// Adds a player and returns its new handle.
    ///
    /// # Errors
    /// `GameError::InvalidName` if the name is blank after trimming.
    pub fn add_player<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        device: Device,
        rng: &mut R,
    ) -> Result<PlayerId, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidName);
        }

        let id = self.unused_player_id(rng);
        self.players.push(Player {
            id: id.clone(),
            name: name.to_string(),
            device,
            is_host: false,
            points: 0,
        });
        Ok(id)
    }

    /// Draws handles until one isn't taken by a player in this session.
    fn unused_player_id<R: Rng + ?Sized>(&self, rng: &mut R) -> PlayerId {
        loop {
            let id = generate_player_id(rng);
            if self.player(&id).is_none() {
                return id;
            }
            tracing::debug!(code = %self.code, "player id collision, retrying");
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Like [`player`](Self::player) but fails with `PlayerNotFound`.
    pub fn require_player(&self, id: &PlayerId) -> Result<&Player, GameError> {
        self.player(id)
            .ok_or_else(|| GameError::PlayerNotFound(id.clone()))
    }

    pub fn is_host(&self, id: &PlayerId) -> bool {
        self.player(id).is_some_and(|p| p.is_host)
    }

    /// The round `current_round_number` points at.
    pub fn current_round(&self) -> Option<&Round> {
        let number = self.current_round_number?;
        self.rounds.iter().find(|r| r.round_number == number)
    }

    /// Splits the session into the current round and the player list so
    /// both can be mutated together.
    pub fn current_round_and_players(&mut self) -> Option<(&mut Round, &mut [Player])> {
        let number = self.current_round_number?;
        let Self {
            rounds, players, ..
        } = self;
        let round = rounds.iter_mut().find(|r| r.round_number == number)?;
        Some((round, players.as_mut_slice()))
    }

    /// Highest round number so far, 0 in the lobby.
    pub fn last_round_number(&self) -> u32 {
        self.rounds
            .iter()
            .map(|r| r.round_number)
            .max()
            .unwrap_or(0)
    }
}
