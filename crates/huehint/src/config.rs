//! Server configuration, with overrides from the environment.

use std::env;
use std::time::Duration;

use huehint_session::StoreConfig;
use tracing::{info, warn};

/// Environment variable overriding [`ServerConfig::bind_addr`].
pub const BIND_ENV: &str = "HUEHINT_BIND";
/// Environment variable overriding [`ServerConfig::connection_timeout`], in seconds.
pub const CONNECTION_TIMEOUT_ENV: &str = "HUEHINT_CONNECTION_TIMEOUT_SECS";
/// Environment variable enabling idle eviction, in seconds.
pub const IDLE_TTL_ENV: &str = "HUEHINT_IDLE_TTL_SECS";
/// Environment variable overriding [`ServerConfig::sweep_interval`], in seconds.
pub const SWEEP_INTERVAL_ENV: &str = "HUEHINT_SWEEP_INTERVAL_SECS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// A connection that sends nothing for this long is closed. Clients
    /// poll `RoundStatus`, so a live client never gets near it.
    pub connection_timeout: Duration,

    /// How often idle sessions are swept. Only matters when
    /// `store.idle_ttl` is set.
    pub sweep_interval: Duration,

    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by any `HUEHINT_*` variables that are set.
    ///
    /// Values that don't parse are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr.trim().to_string();
        }
        if let Some(timeout) = secs(&lookup, CONNECTION_TIMEOUT_ENV) {
            config.connection_timeout = timeout;
        }
        if let Some(ttl) = secs(&lookup, IDLE_TTL_ENV) {
            config.store.idle_ttl = Some(ttl);
        }
        if let Some(interval) = secs(&lookup, SWEEP_INTERVAL_ENV) {
            config.sweep_interval = interval;
        }

        info!(
            bind = %config.bind_addr,
            connection_timeout_secs = config.connection_timeout.as_secs(),
            idle_ttl_secs = config.store.idle_ttl.map(|d| d.as_secs()),
            "configuration loaded"
        );
        config
    }
}

/// Reads a positive number of seconds.
fn secs(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<Duration> {
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            warn!(var = name, "zero is not allowed; using default");
            None
        }
        Ok(n) => Some(Duration::from_secs(n)),
        Err(err) => {
            warn!(var = name, value = %raw, error = %err, "invalid number of seconds; using default");
            None
        }
    }
}
