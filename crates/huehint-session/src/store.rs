//! The session store: hands out codes and maps them to running sessions.
//!
//! # Concurrency note
//!
//! `SessionStore` is a plain `HashMap` owned by whoever constructs it. The
//! server wraps it in a mutex and holds the lock only long enough to insert
//! or clone out a [`SessionHandle`]; the session's own actor does the rest.

use std::collections::HashMap;
use std::time::Instant;

use huehint_game::GameSession;
use huehint_protocol::{
    Mode, PlayerId, SESSION_CODE_ALPHABET, SESSION_CODE_MAX_LEN, SESSION_CODE_MIN_LEN, SessionCode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::handle::spawn_session;
use crate::{SessionError, SessionHandle, StoreConfig};

struct StoreEntry {
    handle: SessionHandle,
    last_access: Instant,
}

/// Every live session, keyed by code.
///
/// ```text
/// create_session() ──→ get() ... get() ──(idle_ttl passes)──→ evict_idle()
/// ```
pub struct SessionStore {
    sessions: HashMap<SessionCode, StoreEntry>,
    rng: StdRng,
    config: StoreConfig,
}

impl SessionStore {
    pub fn new(config: StoreConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            sessions: HashMap::new(),
            rng,
            config,
        }
    }

    /// Creates a session with `host_name` as its host and starts its actor.
    ///
    /// The code is 6–8 characters and never collides with a live session.
    /// Returns the code, a handle to the session, and the host's handle.
    pub fn create_session(
        &mut self,
        mode: Mode,
        host_name: &str,
    ) -> (SessionCode, SessionHandle, PlayerId) {
        let sessions = &self.sessions;
        let code = generate_unique_code(&mut self.rng, |code| sessions.contains_key(code));

        let (session, host_id) = GameSession::new(code.clone(), mode, host_name, &mut self.rng);
        let actor_rng = StdRng::from_rng(&mut self.rng);
        let handle = spawn_session(session, actor_rng, self.config.command_buffer);

        self.sessions.insert(
            code.clone(),
            StoreEntry {
                handle: handle.clone(),
                last_access: Instant::now(),
            },
        );
        tracing::info!(%code, ?mode, sessions = self.sessions.len(), "session created");
        (code, handle, host_id)
    }

    /// Looks up a session and marks it as recently used.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if no session has this code.
    pub fn get(&mut self, code: &SessionCode) -> Result<SessionHandle, SessionError> {
        let entry = self
            .sessions
            .get_mut(code)
            .ok_or_else(|| SessionError::NotFound(code.clone()))?;
        entry.last_access = Instant::now();
        Ok(entry.handle.clone())
    }

    pub fn contains(&self, code: &SessionCode) -> bool {
        self.sessions.contains_key(code)
    }

    /// Removes sessions nobody has looked up for `idle_ttl`.
    ///
    /// Returns the removed handles so the caller can shut their actors down
    /// without holding the store. Does nothing when `idle_ttl` is unset.
    pub fn evict_idle(&mut self) -> Vec<SessionHandle> {
        let Some(ttl) = self.config.idle_ttl else {
            return Vec::new();
        };

        let now = Instant::now();
        let mut evicted = Vec::new();
        self.sessions.retain(|code, entry| {
            let keep = now.duration_since(entry.last_access) < ttl;
            if !keep {
                tracing::info!(%code, "session evicted (idle)");
                evicted.push(entry.handle.clone());
            }
            keep
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Draws a random code of random length in the allowed range.
fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> SessionCode {
    let len = rng.random_range(SESSION_CODE_MIN_LEN..=SESSION_CODE_MAX_LEN);
    let raw: String = (0..len)
        .map(|_| {
            let idx = rng.random_range(0..SESSION_CODE_ALPHABET.len());
            char::from(SESSION_CODE_ALPHABET[idx])
        })
        .collect();
    SessionCode::new(raw)
}

/// Draws codes until one isn't taken.
fn generate_unique_code<R: Rng + ?Sized>(
    rng: &mut R,
    is_taken: impl Fn(&SessionCode) -> bool,
) -> SessionCode {
    loop {
        let code = generate_code(rng);
        if !is_taken(&code) {
            return code;
        }
        tracing::debug!(%code, "session code collision, retrying");
    }
}
