//! Layered config refresh.
//!
//! Reads global, region and service keys in that order; each key that exists
//! overwrites the candidate. Missing keys and store errors leave the candidate
//! untouched. The result is published with a single write, so readers see
//! either the previous message or the final one.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use consul_demo_core::keys::layered_keys;

use crate::app_state::AppState;

/// Why a refresh ran; only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Timer,
    Http,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Startup => "startup",
            Trigger::Timer => "timer",
            Trigger::Http => "http",
        }
    }
}

/// Re-read the layered keys and publish the result. Returns the new message.
pub async fn refresh_config(state: &AppState, trigger: Trigger) -> String {
    tracing::info!(trigger = trigger.as_str(), "reload config");

    let metrics = state.metrics();
    let mut message = state.message().await;

    for (layer, key) in layered_keys(state.identity()) {
        let result = match state.kv().get(&key).await {
            Ok(Some(value)) => {
                message = String::from_utf8_lossy(&value).into_owned();
                "hit"
            }
            Ok(None) => "miss",
            Err(e) => {
                tracing::debug!(%key, kind = e.kind(), error = %e, "kv lookup failed, keeping value");
                "error"
            }
        };
        metrics
            .kv_lookups
            .inc(&[("layer", layer.as_str()), ("result", result)]);
    }

    state.set_message(message.clone()).await;
    metrics.refreshes.inc();
    message
}

/// Refresh every `period` until `stop` flips to true or its sender is dropped.
/// The first tick fires one full period after the call.
pub async fn run_refresh_loop(state: AppState, period: Duration, mut stop: watch::Receiver<bool>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresh_config(&state, Trigger::Timer).await;
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    tracing::debug!("refresh loop stopped");
                    return;
                }
            }
        }
    }
}
