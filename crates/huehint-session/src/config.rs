//! Store configuration.

use std::time::Duration;

/// Default command channel size for session actors.
pub const DEFAULT_COMMAND_BUFFER: usize = 64;

/// Settings for a [`SessionStore`](crate::SessionStore).
///
/// The defaults keep every session for the life of the process and seed
/// randomness from the OS.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Sessions untouched for this long are dropped by
    /// [`evict_idle`](crate::SessionStore::evict_idle). `None` disables
    /// eviction.
    pub idle_ttl: Option<Duration>,

    /// Fixed seed for session codes, player handles, and targets. Tests
    /// set this to get the same game every run.
    pub rng_seed: Option<u64>,

    /// Capacity of each session actor's command channel. When it fills up,
    /// callers wait.
    pub command_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            idle_ttl: None,
            rng_seed: None,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}
