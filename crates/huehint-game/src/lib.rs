//! Game rules for Huehint.
//!
//! A session holds players and a sequence of rounds. In each round one
//! player, the explainer, sees a target cell on a 5×5 color grid and gives
//! two hints. Everyone else gets two guesses, scored by how close they land.
//!
//! # Key types
//!
//! - [`GameSession`] - the state of one game, plus request-level methods
//!   (`join`, `begin_round`, `guess`, `summary`, ...)
//! - [`engine`] - rotation, round creation, hint/move validation, scoring
//! - [`GridCatalog`] - the fixed grid of keyed colors
//! - [`GameError`] - why a request was refused
//!
//! Nothing in this crate does I/O or locking. Callers are expected to give
//! each session a single owner; see the `huehint-session` crate.

mod error;
mod grid;
mod model;
mod play;

pub mod engine;

pub use error::GameError;
pub use grid::{GRID_SIZE, GridCatalog, TargetCell};
pub use model::{DEFAULT_HOST_NAME, GameSession, Move, Player, Round, generate_player_id};
