//! Turn engine: rotation, round creation, hints, moves, scoring.
//!
//! Everything here is a plain function over the model. Randomness is
//! passed in, so a seeded RNG makes a whole game reproducible.
//!
//! Round progress is never stored as a flag. It is derived from the hints
//! and moves each time it's asked for:
//!
//! ```text
//! collecting hints ──(short hint)──→ collecting moves ──(2 moves each)──→ complete
//! ```

use huehint_protocol::{GridPosition, PlayerId, PlayerScore, RoundSummaryView, SessionStatus};
use rand::Rng;
use tracing::debug;

use crate::GameError;
use crate::grid::{GridCatalog, TargetCell};
use crate::model::{GameSession, Move, Player, Round};

/// Guesses each non-explainer gets per round.
pub const ATTEMPTS_PER_ROUND: u8 = 2;

/// Longest accepted long hint, in characters.
pub const LONG_HINT_MAX_CHARS: usize = 50;

// ---------------------------------------------------------------------------
// Rotation and round creation
// ---------------------------------------------------------------------------

/// Picks the next explainer in session order, wrapping around.
///
/// Every player is eligible, the host included. Without a known previous
/// explainer the first player is chosen. Returns `None` only for an empty
/// player list.
pub fn rotate_explainer(players: &[Player], previous: Option<&PlayerId>) -> Option<PlayerId> {
    let first = players.first()?;
    let next = previous
        .and_then(|prev| players.iter().position(|p| &p.id == prev))
        .map(|idx| &players[(idx + 1) % players.len()])
        .unwrap_or(first);
    Some(next.id.clone())
}

/// Opens a new round and makes it current.
///
/// The round number is one past the highest so far. The target is drawn
/// uniformly from the grid. The first call moves the session out of the
/// lobby.
///
/// # Errors
/// `GameError::PlayerNotFound` if the session somehow has no players.
pub fn start_round<'a, R: Rng + ?Sized>(
    session: &'a mut GameSession,
    previous: Option<&PlayerId>,
    rng: &mut R,
) -> Result<&'a Round, GameError> {
    let explainer_id = rotate_explainer(&session.players, previous)
        .ok_or_else(|| GameError::PlayerNotFound(PlayerId::new("")))?;
    let target = GridCatalog::random_cell(rng);
    Ok(open_round(session, explainer_id, target))
}

/// Appends a round with a known explainer and target.
pub(crate) fn open_round(
    session: &mut GameSession,
    explainer_id: PlayerId,
    target: TargetCell,
) -> &Round {
    let round_number = session.last_round_number() + 1;
    debug!(
        code = %session.code,
        round = round_number,
        explainer = %explainer_id,
        target = target.key,
        "opening round"
    );

    session.current_round_number = Some(round_number);
    session.status = SessionStatus::InGame;
    session
        .rounds
        .push(Round::new(round_number, explainer_id, target));
    &session.rounds[session.rounds.len() - 1]
}

// ---------------------------------------------------------------------------
// Hints
// ---------------------------------------------------------------------------

/// Records the explainer's hints, replacing any earlier ones.
///
/// Both hints are trimmed first. The short hint must be a single word; the
/// long hint must be non-empty and at most [`LONG_HINT_MAX_CHARS`] long.
///
/// # Errors
/// `NotExplainer` if someone else submits, `InvalidHint` on bad text.
pub fn submit_hint(
    round: &mut Round,
    submitter: &PlayerId,
    short_hint: &str,
    long_hint: &str,
) -> Result<(), GameError> {
    if !round.is_explainer(submitter) {
        return Err(GameError::NotExplainer);
    }

    let short_hint = short_hint.trim();
    let long_hint = long_hint.trim();
    if short_hint.is_empty() {
        return Err(GameError::InvalidHint("short hint is required"));
    }
    if short_hint.chars().any(char::is_whitespace) {
        return Err(GameError::InvalidHint("short hint must be a single word"));
    }
    if long_hint.is_empty() {
        return Err(GameError::InvalidHint("long hint is required"));
    }
    if long_hint.chars().count() > LONG_HINT_MAX_CHARS {
        return Err(GameError::InvalidHint("long hint must be at most 50 characters"));
    }

    round.short_hint = Some(short_hint.to_string());
    round.long_hint = Some(long_hint.to_string());
    debug!(round = round.round_number, "hints accepted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Moves and scoring
// ---------------------------------------------------------------------------

/// Which attempt `player_id` may submit next, if any.
///
/// Attempt 1 needs the short hint; attempt 2 needs the long hint and a
/// recorded attempt 1. The explainer never has one.
pub fn next_attempt(round: &Round, player_id: &PlayerId) -> Option<u8> {
    if round.is_explainer(player_id) {
        return None;
    }
    if round.short_hint.is_some() && !round.has_attempt(player_id, 1) {
        return Some(1);
    }
    if round.long_hint.is_some()
        && round.has_attempt(player_id, 1)
        && !round.has_attempt(player_id, 2)
    {
        return Some(2);
    }
    None
}

/// King's-move distance between two cells.
pub fn chebyshev_distance(a: GridPosition, b: GridPosition) -> u8 {
    a.row.abs_diff(b.row).max(a.col.abs_diff(b.col))
}

/// Points for a guess `distance` cells away from the target.
pub fn score_for_distance(distance: u8) -> u32 {
    match distance {
        0 => 4,
        1 => 3,
        2 => 2,
        _ => 0,
    }
}

/// What the explainer earns for a guess scoring `score`.
pub fn explainer_bonus(score: u32) -> u32 {
    score.saturating_sub(1)
}

/// Scores and records a guess, crediting the explainer's bonus.
///
/// The guess's score only counts toward the guesser's round score; their
/// cumulative points are left alone.
///
/// Checks run in this order: membership, explainer, attempt availability,
/// then coordinates. Nothing is recorded unless every check passes, so a
/// player can never hold two moves for the same attempt.
///
/// # Errors
/// `PlayerNotFound`, `IsExplainer`, `NoAttemptAvailable`, or
/// `InvalidCoordinates`.
pub fn submit_move(
    round: &mut Round,
    players: &mut [Player],
    player_id: &PlayerId,
    row: i32,
    col: i32,
) -> Result<Move, GameError> {
    if !players.iter().any(|p| &p.id == player_id) {
        return Err(GameError::PlayerNotFound(player_id.clone()));
    }
    if round.is_explainer(player_id) {
        return Err(GameError::IsExplainer);
    }
    let attempt_number = next_attempt(round, player_id).ok_or(GameError::NoAttemptAvailable)?;
    if !GridCatalog::contains(row, col) {
        return Err(GameError::InvalidCoordinates { row, col });
    }

    // In range per the check above.
    let guess = GridPosition::new(row as u8, col as u8);
    let distance = chebyshev_distance(round.target.position, guess);
    let score = score_for_distance(distance);

    let mv = Move {
        player_id: player_id.clone(),
        attempt_number,
        guess,
        distance,
        score,
    };
    round.moves.push(mv.clone());

    if score > 0 {
        if let Some(explainer) = players.iter_mut().find(|p| p.id == round.explainer_id) {
            explainer.points += explainer_bonus(score);
        }
    }

    debug!(
        round = round.round_number,
        player_id = %player_id,
        attempt = attempt_number,
        distance,
        score,
        "move scored"
    );
    Ok(mv)
}

// ---------------------------------------------------------------------------
// Completion and results
// ---------------------------------------------------------------------------

/// `true` once every player except the explainer has used both attempts.
pub fn is_round_over(players: &[Player], round: &Round) -> bool {
    players
        .iter()
        .filter(|p| !round.is_explainer(&p.id))
        .all(|p| round.moves_by(&p.id).count() >= usize::from(ATTEMPTS_PER_ROUND))
}

/// Per-player results for `round`, in session order.
///
/// `round_score` only counts the player's own guesses, so the explainer's
/// is always 0; bonuses show up in `total_score`.
pub fn round_summary(players: &[Player], round: &Round) -> RoundSummaryView {
    let players = players
        .iter()
        .map(|p| PlayerScore {
            name: p.name.clone(),
            round_score: round.moves_by(&p.id).map(|m| m.score).sum(),
            total_score: p.points,
        })
        .collect();

    RoundSummaryView {
        round_number: round.round_number,
        target_cell: round.target.key.to_string(),
        target_color: round.target.color.to_string(),
        target_position: round.target.position,
        short_hint: round.short_hint.clone().unwrap_or_default(),
        long_hint: round.long_hint.clone().unwrap_or_default(),
        players,
    }
}
