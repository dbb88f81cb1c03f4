//! `HuehintServer` builder and server loop.
//!
//! This is the entry point for running a Huehint server. It ties together
//! all the layers: transport → protocol → gateway → session store.

use std::net::SocketAddr;
use std::sync::Arc;

use huehint_protocol::JsonCodec;

use crate::config::ServerConfig;
use crate::gateway::SessionGateway;
use crate::handler::handle_connection;
use crate::transport::WsListener;
use crate::HuehintError;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) gateway: SessionGateway,
    pub(crate) codec: JsonCodec,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a Huehint server.
///
/// # Example
///
/// ```rust,no_run
/// use huehint::prelude::*;
///
/// # async fn start() -> Result<(), HuehintError> {
/// let server = HuehintServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct HuehintServerBuilder {
    bind_addr: Option<String>,
    config: ServerConfig,
}

impl HuehintServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: None,
            config: ServerConfig::default(),
        }
    }

    /// Sets the address to bind the server to. Takes precedence over the
    /// address in [`config`](Self::config).
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = Some(addr.to_string());
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and sets up an empty session store.
    pub async fn build(self) -> Result<HuehintServer, HuehintError> {
        let mut config = self.config;
        if let Some(addr) = self.bind_addr {
            config.bind_addr = addr;
        }

        let listener = WsListener::bind(&config.bind_addr).await?;
        let state = Arc::new(ServerState {
            gateway: SessionGateway::new(config.store.clone()),
            codec: JsonCodec,
            config,
        });

        Ok(HuehintServer { listener, state })
    }
}

impl Default for HuehintServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Huehint server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct HuehintServer {
    listener: WsListener,
    state: Arc<ServerState>,
}

impl HuehintServer {
    /// Creates a new builder.
    pub fn builder() -> HuehintServerBuilder {
        HuehintServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns a handler task per connection and, when idle eviction is
    /// configured, a sweeper task. Runs until the process is terminated.
    pub async fn run(self) -> Result<(), HuehintError> {
        tracing::info!("Huehint server running");

        if self.state.config.store.idle_ttl.is_some() {
            tokio::spawn(sweep_idle_sessions(Arc::clone(&self.state)));
        }

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Periodically drops sessions that have gone idle.
async fn sweep_idle_sessions(state: Arc<ServerState>) {
    let mut interval = tokio::time::interval(state.config.sweep_interval);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        let evicted = state.gateway.evict_idle().await;
        if !evicted.is_empty() {
            let remaining = state.gateway.session_count().await;
            tracing::info!(evicted = evicted.len(), remaining, "idle sessions swept");
        }
    }
}
