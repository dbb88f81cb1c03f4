//! Wire protocol for Huehint.
//!
//! This crate defines the language clients and the gateway speak:
//!
//! - **Identities and enums** ([`PlayerId`], [`SessionCode`], [`Mode`],
//!   [`Device`], [`SessionStatus`], [`Role`], ...) shared by every layer.
//! - **Messages** ([`Envelope`], [`Request`], [`Response`], read-model
//!   views, [`ErrorReply`]) that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) that turns them into bytes.
//!
//! ```text
//! Transport (frames) → Protocol (Envelope) → Gateway → Session store → Game rules
//! ```

mod codec;
mod error;
mod messages;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{
    BoardRound, BoardView, Envelope, ErrorCode, ErrorReply, GridCellView, Payload, PlayerEntry,
    PlayerScore, Request, Response, RoundStart, RoundStatusView, RoundSummaryView,
};
pub use types::{
    Device, GridPosition, Mode, PlayerId, RedirectRole, Role, SESSION_CODE_ALPHABET,
    SESSION_CODE_MAX_LEN, SESSION_CODE_MIN_LEN, SessionCode, SessionStatus,
};
