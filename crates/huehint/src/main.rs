//! Huehint server binary.

use huehint::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), HuehintError> {
    init_tracing();

    let server = HuehintServer::builder()
        .config(ServerConfig::from_env())
        .build()
        .await?;
    if let Ok(addr) = server.local_addr() {
        info!(%addr, "listening");
    }

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}

/// Log filter from `RUST_LOG`, defaulting to `info`.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
