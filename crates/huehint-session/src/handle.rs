//! Session actor: a Tokio task that owns one [`GameSession`].
//!
//! All reads and writes of a session go through its command channel, so
//! two players submitting moves at the same moment are applied one after
//! the other and a status poll never sees a half-recorded move. Sessions
//! don't share anything, so they run fully in parallel.

use huehint_game::{GameError, GameSession, Move};
use huehint_protocol::{
    BoardView, Device, PlayerEntry, PlayerId, RoundStart, RoundStatusView, RoundSummaryView,
    SessionCode, SessionStatus,
};
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use crate::SessionError;

type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Commands sent to a session actor. Each carries a reply channel.
pub(crate) enum SessionCommand {
    Join {
        name: String,
        device: Device,
        reply: Reply<PlayerId>,
    },
    Resume {
        player_id: PlayerId,
        reply: Reply<SessionStatus>,
    },
    ListPlayers {
        reply: oneshot::Sender<Vec<PlayerEntry>>,
    },
    StartRound {
        player_id: PlayerId,
        reply: Reply<RoundStart>,
    },
    SubmitHint {
        player_id: PlayerId,
        short_hint: String,
        long_hint: String,
        reply: Reply<()>,
    },
    CurrentAttempt {
        player_id: PlayerId,
        reply: Reply<u8>,
    },
    SubmitMove {
        player_id: PlayerId,
        row: i32,
        col: i32,
        reply: Reply<Move>,
    },
    RoundStatus {
        player_id: PlayerId,
        reply: Reply<RoundStatusView>,
    },
    RoundSummary {
        reply: Reply<RoundSummaryView>,
    },
    NextRound {
        player_id: PlayerId,
        reply: Reply<u32>,
    },
    Board {
        reply: oneshot::Sender<BoardView>,
    },
    Snapshot {
        reply: oneshot::Sender<GameSession>,
    },
    Shutdown,
}

/// Handle to a running session actor.
///
/// Cheap to clone. The actor stops once every handle is dropped or
/// [`shutdown`](Self::shutdown) is called; later calls then fail with
/// `SessionError::Unavailable`.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    code: SessionCode,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    /// Adds a player. Returns the new player's handle.
    pub async fn join(&self, name: &str, device: Device) -> Result<PlayerId, SessionError> {
        let name = name.to_string();
        Ok(self
            .call(|reply| SessionCommand::Join {
                name,
                device,
                reply,
            })
            .await??)
    }

    /// Confirms `player_id` belongs to this session and returns its status.
    pub async fn resume(&self, player_id: &PlayerId) -> Result<SessionStatus, SessionError> {
        let player_id = player_id.clone();
        Ok(self
            .call(|reply| SessionCommand::Resume { player_id, reply })
            .await??)
    }

    pub async fn list_players(&self) -> Result<Vec<PlayerEntry>, SessionError> {
        self.call(|reply| SessionCommand::ListPlayers { reply })
            .await
    }

    pub async fn start_round(&self, player_id: &PlayerId) -> Result<RoundStart, SessionError> {
        let player_id = player_id.clone();
        Ok(self
            .call(|reply| SessionCommand::StartRound { player_id, reply })
            .await??)
    }

    pub async fn submit_hint(
        &self,
        player_id: &PlayerId,
        short_hint: &str,
        long_hint: &str,
    ) -> Result<(), SessionError> {
        let player_id = player_id.clone();
        let short_hint = short_hint.to_string();
        let long_hint = long_hint.to_string();
        Ok(self
            .call(|reply| SessionCommand::SubmitHint {
                player_id,
                short_hint,
                long_hint,
                reply,
            })
            .await??)
    }

    pub async fn current_attempt(&self, player_id: &PlayerId) -> Result<u8, SessionError> {
        let player_id = player_id.clone();
        Ok(self
            .call(|reply| SessionCommand::CurrentAttempt { player_id, reply })
            .await??)
    }

    pub async fn submit_move(
        &self,
        player_id: &PlayerId,
        row: i32,
        col: i32,
    ) -> Result<Move, SessionError> {
        let player_id = player_id.clone();
        Ok(self
            .call(|reply| SessionCommand::SubmitMove {
                player_id,
                row,
                col,
                reply,
            })
            .await??)
    }

    pub async fn round_status(&self, player_id: &PlayerId) -> Result<RoundStatusView, SessionError> {
        let player_id = player_id.clone();
        Ok(self
            .call(|reply| SessionCommand::RoundStatus { player_id, reply })
            .await??)
    }

    pub async fn round_summary(&self) -> Result<RoundSummaryView, SessionError> {
        Ok(self
            .call(|reply| SessionCommand::RoundSummary { reply })
            .await??)
    }

    pub async fn next_round(&self, player_id: &PlayerId) -> Result<u32, SessionError> {
        let player_id = player_id.clone();
        Ok(self
            .call(|reply| SessionCommand::NextRound { player_id, reply })
            .await??)
    }

    pub async fn board(&self) -> Result<BoardView, SessionError> {
        self.call(|reply| SessionCommand::Board { reply }).await
    }

    /// A consistent copy of the whole session.
    pub async fn snapshot(&self) -> Result<GameSession, SessionError> {
        self.call(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    /// Tells the actor to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))
    }
}

/// The actor's private state.
struct SessionActor {
    session: GameSession,
    rng: StdRng,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    async fn run(mut self) {
        tracing::info!(code = %self.session.code, "session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            let session = &mut self.session;
            let rng = &mut self.rng;
            match cmd {
                SessionCommand::Join {
                    name,
                    device,
                    reply,
                } => {
                    let _ = reply.send(session.join(&name, device, rng));
                }
                SessionCommand::Resume { player_id, reply } => {
                    let result = session
                        .require_player(&player_id)
                        .map(|_| session.status);
                    let _ = reply.send(result);
                }
                SessionCommand::ListPlayers { reply } => {
                    let _ = reply.send(session.list_players());
                }
                SessionCommand::StartRound { player_id, reply } => {
                    let _ = reply.send(session.begin_round(&player_id, rng));
                }
                SessionCommand::SubmitHint {
                    player_id,
                    short_hint,
                    long_hint,
                    reply,
                } => {
                    let _ = reply.send(session.hint(&player_id, &short_hint, &long_hint));
                }
                SessionCommand::CurrentAttempt { player_id, reply } => {
                    let _ = reply.send(session.current_attempt(&player_id));
                }
                SessionCommand::SubmitMove {
                    player_id,
                    row,
                    col,
                    reply,
                } => {
                    let _ = reply.send(session.guess(&player_id, row, col));
                }
                SessionCommand::RoundStatus { player_id, reply } => {
                    let _ = reply.send(session.status(&player_id));
                }
                SessionCommand::RoundSummary { reply } => {
                    let _ = reply.send(session.summary());
                }
                SessionCommand::NextRound { player_id, reply } => {
                    let _ = reply.send(session.advance(&player_id, rng));
                }
                SessionCommand::Board { reply } => {
                    let _ = reply.send(session.board());
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(session.clone());
                }
                SessionCommand::Shutdown => {
                    tracing::info!(code = %session.code, "session shutting down");
                    break;
                }
            }
        }

        tracing::info!(code = %self.session.code, "session actor stopped");
    }
}

/// Spawns an actor owning `session` and returns a handle to it.
///
/// `buffer` bounds the command channel; a full channel makes callers wait.
pub(crate) fn spawn_session(session: GameSession, rng: StdRng, buffer: usize) -> SessionHandle {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let code = session.code.clone();

    let actor = SessionActor {
        session,
        rng,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    SessionHandle { code, sender: tx }
}
