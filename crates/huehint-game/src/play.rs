//! Request-level operations on a single session.
//!
//! Each method here answers one client request. It checks who is asking,
//! finds the current round, and hands off to [`crate::engine`]. The session
//! store calls these from inside the session's actor, so each one sees and
//! leaves the session in a consistent state.

use huehint_protocol::{
    BoardRound, BoardView, Device, GridCellView, PlayerEntry, PlayerId, RedirectRole, Role,
    RoundStart, RoundStatusView, RoundSummaryView,
};
use rand::Rng;
use tracing::info;

use crate::GameError;
use crate::engine;
use crate::grid::GridCatalog;
use crate::model::{GameSession, Move, Round};

impl GameSession {
    /// Adds a player from the join form.
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        device: Device,
        rng: &mut R,
    ) -> Result<PlayerId, GameError> {
        let player_id = self.add_player(name, device, rng)?;
        info!(
            code = %self.code,
            player_id = %player_id,
            players = self.players.len(),
            "player joined"
        );
        Ok(player_id)
    }

    /// Everyone in the session, in join order.
    pub fn list_players(&self) -> Vec<PlayerEntry> {
        self.players
            .iter()
            .map(|p| PlayerEntry {
                name: p.name.clone(),
                is_host: p.is_host,
                points: p.points,
            })
            .collect()
    }

    /// Starts the game, or tells a late caller where to go.
    ///
    /// In the lobby only the host may call this; it opens round 1. Once the
    /// game is running nothing is created: the current round is returned
    /// with the caller's redirect.
    pub fn begin_round<R: Rng + ?Sized>(
        &mut self,
        requester: &PlayerId,
        rng: &mut R,
    ) -> Result<RoundStart, GameError> {
        self.require_player(requester)?;

        if self.status.is_in_game() {
            let round = self.round()?;
            let redirect = if round.is_explainer(requester) {
                RedirectRole::SubmitHint
            } else {
                RedirectRole::WaitingHint
            };
            return Ok(RoundStart {
                round_number: round.round_number,
                explainer_id: round.explainer_id.clone(),
                redirect,
            });
        }

        if !self.is_host(requester) {
            return Err(GameError::NotHost);
        }

        let code = self.code.clone();
        let round = engine::start_round(self, None, rng)?;
        info!(code = %code, round = round.round_number, "game started");

        let redirect = if round.is_explainer(requester) {
            RedirectRole::SubmitHint
        } else {
            RedirectRole::Board
        };
        Ok(RoundStart {
            round_number: round.round_number,
            explainer_id: round.explainer_id.clone(),
            redirect,
        })
    }

    /// The explainer sends (or replaces) this round's hints.
    pub fn hint(
        &mut self,
        player_id: &PlayerId,
        short_hint: &str,
        long_hint: &str,
    ) -> Result<(), GameError> {
        self.require_player(player_id)?;
        let (round, _) = self
            .current_round_and_players()
            .ok_or(GameError::RoundNotFound)?;
        engine::submit_hint(round, player_id, short_hint, long_hint)
    }

    /// Which attempt the player may submit next.
    pub fn current_attempt(&self, player_id: &PlayerId) -> Result<u8, GameError> {
        self.require_player(player_id)?;
        let round = self.round()?;
        if round.is_explainer(player_id) {
            return Err(GameError::IsExplainer);
        }
        engine::next_attempt(round, player_id).ok_or(GameError::NoAttemptAvailable)
    }

    /// Scores a guess against the current round.
    pub fn guess(&mut self, player_id: &PlayerId, row: i32, col: i32) -> Result<Move, GameError> {
        let (round, players) = self
            .current_round_and_players()
            .ok_or(GameError::RoundNotFound)?;
        engine::submit_move(round, players, player_id, row, col)
    }

    /// What a polling client should show.
    pub fn status(&self, player_id: &PlayerId) -> Result<RoundStatusView, GameError> {
        self.require_player(player_id)?;
        let round = self.round()?;

        let role = if round.is_explainer(player_id) {
            Role::Explainer
        } else if engine::next_attempt(round, player_id).is_some() {
            Role::Guessing
        } else {
            Role::Waiting
        };

        Ok(RoundStatusView {
            round_number: round.round_number,
            role,
            round_over: engine::is_round_over(&self.players, round),
        })
    }

    /// Results of the current round, available once it is over.
    pub fn summary(&self) -> Result<RoundSummaryView, GameError> {
        let round = self.round()?;
        if !engine::is_round_over(&self.players, round) {
            return Err(GameError::RoundInProgress(round.round_number));
        }
        Ok(engine::round_summary(&self.players, round))
    }

    /// The explainer hands over to the next player. Returns the new round
    /// number.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        requester: &PlayerId,
        rng: &mut R,
    ) -> Result<u32, GameError> {
        self.require_player(requester)?;
        let previous = self.round()?.explainer_id.clone();
        if &previous != requester {
            return Err(GameError::NotExplainer);
        }

        let code = self.code.clone();
        let round = engine::start_round(self, Some(&previous), rng)?;
        info!(
            code = %code,
            round = round.round_number,
            explainer = %round.explainer_id,
            "round started"
        );
        Ok(round.round_number)
    }

    /// The shared-screen view. Never reveals the target.
    pub fn board(&self) -> BoardView {
        let cells = GridCatalog::cells()
            .map(|cell| GridCellView {
                key: cell.key.to_string(),
                color: cell.color.to_string(),
                position: cell.position,
            })
            .collect();

        let round = self.current_round().map(|round| BoardRound {
            round_number: round.round_number,
            explainer_name: self
                .player(&round.explainer_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            short_hint: round.short_hint.clone().unwrap_or_default(),
            long_hint: round.long_hint.clone().unwrap_or_default(),
            moves_recorded: round.moves.len(),
            round_over: engine::is_round_over(&self.players, round),
        });

        BoardView {
            code: self.code.clone(),
            status: self.status,
            grid_size: self.grid_size,
            cells,
            players: self.list_players(),
            round,
        }
    }

    fn round(&self) -> Result<&Round, GameError> {
        self.current_round().ok_or(GameError::RoundNotFound)
    }
}
