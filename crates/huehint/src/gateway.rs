//! The session gateway: every game operation, addressed by session code.
//!
//! This is the surface a transport calls into. Each method resolves the
//! code to a session handle under a short-lived lock and then talks to the
//! session's actor with the lock released, so a slow session never holds
//! up lookups for the others.

use huehint_game::{DEFAULT_HOST_NAME, Move};
use huehint_protocol::{
    BoardView, Device, Mode, PlayerEntry, PlayerId, RoundStart, RoundStatusView,
    RoundSummaryView, SessionCode, SessionStatus,
};
use huehint_session::{SessionError, SessionHandle, SessionStore, StoreConfig};
use tokio::sync::Mutex;

/// Shared entry point to all sessions.
pub struct SessionGateway {
    store: Mutex<SessionStore>,
}

impl SessionGateway {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            store: Mutex::new(SessionStore::new(config)),
        }
    }

    /// Opens a session. Returns its code and the host's player handle.
    pub async fn create_session(
        &self,
        mode: Mode,
        host_name: Option<&str>,
    ) -> (SessionCode, PlayerId) {
        let host_name = host_name.unwrap_or(DEFAULT_HOST_NAME);
        let (code, _, host_id) = self.store.lock().await.create_session(mode, host_name);
        (code, host_id)
    }

    pub async fn join_session(
        &self,
        code: &SessionCode,
        name: &str,
        device: Device,
    ) -> Result<PlayerId, SessionError> {
        self.handle(code).await?.join(name, device).await
    }

    /// Checks that `player_id` is in the session, for reconnecting clients.
    pub async fn resume(
        &self,
        code: &SessionCode,
        player_id: &PlayerId,
    ) -> Result<SessionStatus, SessionError> {
        self.handle(code).await?.resume(player_id).await
    }

    pub async fn list_players(&self, code: &SessionCode) -> Result<Vec<PlayerEntry>, SessionError> {
        self.handle(code).await?.list_players().await
    }

    pub async fn start_round(
        &self,
        code: &SessionCode,
        player_id: &PlayerId,
    ) -> Result<RoundStart, SessionError> {
        self.handle(code).await?.start_round(player_id).await
    }

    pub async fn submit_hint(
        &self,
        code: &SessionCode,
        player_id: &PlayerId,
        short_hint: &str,
        long_hint: &str,
    ) -> Result<(), SessionError> {
        self.handle(code)
            .await?
            .submit_hint(player_id, short_hint, long_hint)
            .await
    }

    pub async fn current_attempt(
        &self,
        code: &SessionCode,
        player_id: &PlayerId,
    ) -> Result<u8, SessionError> {
        self.handle(code).await?.current_attempt(player_id).await
    }

    pub async fn submit_move(
        &self,
        code: &SessionCode,
        player_id: &PlayerId,
        row: i32,
        col: i32,
    ) -> Result<Move, SessionError> {
        self.handle(code)
            .await?
            .submit_move(player_id, row, col)
            .await
    }

    pub async fn round_status(
        &self,
        code: &SessionCode,
        player_id: &PlayerId,
    ) -> Result<RoundStatusView, SessionError> {
        self.handle(code).await?.round_status(player_id).await
    }

    pub async fn round_summary(&self, code: &SessionCode) -> Result<RoundSummaryView, SessionError> {
        self.handle(code).await?.round_summary().await
    }

    pub async fn next_round(
        &self,
        code: &SessionCode,
        player_id: &PlayerId,
    ) -> Result<u32, SessionError> {
        self.handle(code).await?.next_round(player_id).await
    }

    pub async fn board(&self, code: &SessionCode) -> Result<BoardView, SessionError> {
        self.handle(code).await?.board().await
    }

    /// Removes idle sessions and shuts their actors down. See
    /// [`SessionStore::evict_idle`]. Returns the evicted codes.
    pub async fn evict_idle(&self) -> Vec<SessionCode> {
        let evicted = self.store.lock().await.evict_idle();

        let mut codes = Vec::with_capacity(evicted.len());
        for handle in evicted {
            // An actor that already stopped has nothing left to shut down.
            let _ = handle.shutdown().await;
            codes.push(handle.code().clone());
        }
        codes
    }

    pub async fn session_count(&self) -> usize {
        self.store.lock().await.len()
    }

    async fn handle(&self, code: &SessionCode) -> Result<SessionHandle, SessionError> {
        // Lock is released at the end of this statement.
        self.store.lock().await.get(code)
    }
}
