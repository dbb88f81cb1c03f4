//! # Huehint
//!
//! Server for a multiplayer color-guessing party game.
//!
//! A host opens a session and shares its code. Each round one player, the
//! explainer, sees a hidden cell on a 5×5 color grid and gives a one-word
//! hint and a short phrase. Everyone else gets two guesses, scored by how
//! close they land; the explainer earns a bonus for every guess that scores.
//!
//! Clients talk to the server over WebSocket with JSON envelopes (see
//! `huehint_protocol`). In-process callers can use [`SessionGateway`]
//! directly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use huehint::prelude::*;
//!
//! # async fn start() -> Result<(), HuehintError> {
//! let server = HuehintServer::builder()
//!     .config(ServerConfig::from_env())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod gateway;
mod handler;
mod server;
mod transport;

pub use config::ServerConfig;
pub use error::HuehintError;
pub use gateway::SessionGateway;
pub use server::{HuehintServer, HuehintServerBuilder};
pub use transport::{ConnectionId, TransportError};

/// Everything needed to run a server or talk to it in tests.
pub mod prelude {
    pub use crate::{HuehintError, HuehintServer, HuehintServerBuilder, ServerConfig, SessionGateway};
    pub use huehint_protocol::{
        BoardView, Device, Envelope, ErrorCode, ErrorReply, Mode, Payload, PlayerEntry, PlayerId,
        RedirectRole, Request, Response, Role, RoundStart, RoundStatusView, RoundSummaryView,
        SessionCode, SessionStatus,
    };
    pub use huehint_session::{SessionError, StoreConfig};
}
