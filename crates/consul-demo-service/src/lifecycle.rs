//! Process lifecycle: register, refresh, serve, drain, deregister.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use consul_demo_core::error::{DemoError, Result};

use crate::app_state::AppState;
use crate::discovery::{Registration, ServiceRegistry};
use crate::refresh::{refresh_config, run_refresh_loop, Trigger};
use crate::router::build_router;

/// Run the service on an already bound `listener` until `shutdown` resolves.
///
/// Registration failures are logged and do not stop the service. Once
/// registered, the entry is deregistered on every exit path, including a
/// drain that outlives the grace period.
pub async fn run<S>(
    state: AppState,
    registry: &dyn ServiceRegistry,
    listener: TcpListener,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()> + Send,
{
    let reg = Registration::for_identity(state.identity(), &state.cfg().check);
    match registry.register(&reg).await {
        Ok(()) => tracing::info!(id = %reg.id, check = %reg.check.http, "service registered"),
        Err(e) => tracing::warn!(id = %reg.id, error = %e, "service registration failed"),
    }

    let (stop_tx, stop_rx) = watch::channel(false);

    let period = Duration::from_secs(state.cfg().service.refresh_interval_secs);
    tokio::spawn(run_refresh_loop(state.clone(), period, stop_rx.clone()));

    refresh_config(&state, Trigger::Startup).await;

    let app = build_router(state.clone());
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_stop(stop_rx))
            .into_future(),
    );
    tracing::info!(service_id = %state.service_id(), "server started");

    let early_exit = tokio::select! {
        _ = shutdown => None,
        res = &mut server => Some(res),
    };

    let _ = stop_tx.send(true);

    let outcome = match early_exit {
        Some(res) => flatten(res),
        None => {
            let grace = Duration::from_secs(state.cfg().service.shutdown_grace_secs);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(res) => flatten(res),
                Err(_) => {
                    tracing::warn!(grace_secs = grace.as_secs(), "drain timed out, dropping connections");
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    match registry.deregister(&reg.id).await {
        Ok(()) => tracing::info!(id = %reg.id, "service deregistered"),
        Err(e) => tracing::warn!(id = %reg.id, error = %e, "service deregistration failed"),
    }

    tracing::info!("server terminated");
    outcome
}

fn flatten(res: std::result::Result<std::io::Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(DemoError::Io(e)),
        Err(e) => Err(DemoError::Internal(format!("server task failed: {e}"))),
    }
}

async fn wait_for_stop(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
