//! consul-demo-service
//!
//! - Registers with the local Consul agent (HTTP check on /livez)
//! - Refreshes a layered message from Consul KV at startup, every 30s and on /refresh
//! - Serves /, /refresh, /livez and /metrics
//! - Drains and deregisters on SIGINT/SIGTERM

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use consul_demo_core::{Result, ServiceIdentity};
use consul_demo_service::{
    app_state::AppState,
    config::{self, AgentConfig},
    discovery::{ConsulClient, KvStore},
    lifecycle,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "consul-demo-service failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let identity = ServiceIdentity::from_env()?;
    let cfg = config::load_from_env()?;
    let agent = AgentConfig::from_env()?;

    let consul = Arc::new(ConsulClient::new(&agent)?);
    let kv: Arc<dyn KvStore> = consul.clone();

    tracing::info!(
        service_id = %identity.service_id(),
        port = identity.port,
        agent = %consul.base_url(),
        "consul-demo-service starting"
    );

    let listen = SocketAddr::from(([0, 0, 0, 0], identity.port));
    let listener = tokio::net::TcpListener::bind(listen).await?;

    let state = AppState::new(identity, cfg, kv);
    lifecycle::run(state, &*consul, listener, lifecycle::shutdown_signal()).await
}
