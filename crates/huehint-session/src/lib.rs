//! Session storage for Huehint.
//!
//! This crate keeps track of every running game:
//!
//! 1. **Store** - generates session codes and maps them to sessions
//!    ([`SessionStore`])
//! 2. **Actors** - each session lives in its own Tokio task and is driven
//!    through a [`SessionHandle`], which serializes all access to it
//! 3. **Eviction** - optional removal of sessions idle past a TTL
//!
//! # How it fits in the stack
//!
//! ```text
//! Gateway (above)  ← resolves codes to handles, forwards requests
//!     ↕
//! Session Layer (this crate)  ← owns sessions, one actor each
//!     ↕
//! Game rules (below)  ← pure functions over a GameSession
//! ```

mod config;
mod error;
mod handle;
mod store;

pub use config::{DEFAULT_COMMAND_BUFFER, StoreConfig};
pub use error::SessionError;
pub use handle::SessionHandle;
pub use store::SessionStore;
