#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use consul_demo_core::ServiceIdentity;
use consul_demo_service::app_state::AppState;
use consul_demo_service::config::ServiceConfig;
use consul_demo_service::discovery::MemoryKv;
use consul_demo_service::refresh::{refresh_config, run_refresh_loop, Trigger};

fn identity() -> ServiceIdentity {
    ServiceIdentity {
        instance: "2".into(),
        region: "eu".into(),
        ..ServiceIdentity::default()
    }
}

fn state_with(kv: Arc<MemoryKv>) -> AppState {
    AppState::new(identity(), ServiceConfig::default(), kv)
}

#[tokio::test]
async fn no_keys_keeps_default() {
    let state = state_with(Arc::new(MemoryKv::new()));
    let msg = refresh_config(&state, Trigger::Startup).await;
    assert_eq!(msg, "default");
    assert_eq!(state.message().await, "default");
    assert_eq!(state.metrics().refreshes.get(), 1);
}

#[tokio::test]
async fn layers_override_in_priority_order() {
    let kv = Arc::new(MemoryKv::new());
    let state = state_with(kv.clone());

    kv.put("config/global/message", "from global");
    refresh_config(&state, Trigger::Http).await;
    assert_eq!(state.message().await, "from global");

    kv.put("config/region/eu/message", "from region");
    refresh_config(&state, Trigger::Http).await;
    assert_eq!(state.message().await, "from region");

    kv.put("config/service/eu-2/message", "from service");
    refresh_config(&state, Trigger::Http).await;
    assert_eq!(state.message().await, "from service");

    assert_eq!(state.metrics().refreshes.get(), 3);
}

#[tokio::test]
async fn other_regions_are_ignored() {
    let kv = Arc::new(MemoryKv::new());
    kv.put("config/region/us/message", "not mine");
    kv.put("config/service/eu-3/message", "not mine either");
    let state = state_with(kv);

    refresh_config(&state, Trigger::Timer).await;
    assert_eq!(state.message().await, "default");
}

#[tokio::test]
async fn removed_key_keeps_last_value() {
    let kv = Arc::new(MemoryKv::new());
    kv.put("config/global/message", "hello");
    let state = state_with(kv.clone());
    refresh_config(&state, Trigger::Timer).await;

    kv.delete("config/global/message");
    refresh_config(&state, Trigger::Timer).await;
    assert_eq!(state.message().await, "hello");
}

#[tokio::test]
async fn store_errors_leave_value_unchanged() {
    let kv = Arc::new(MemoryKv::new());
    kv.put("config/global/message", "global");
    kv.put("config/service/eu-2/message", "service");
    kv.fail("config/service/eu-2/message");
    let state = state_with(kv.clone());

    refresh_config(&state, Trigger::Timer).await;
    assert_eq!(state.message().await, "global");

    let m = state.metrics();
    assert_eq!(m.kv_lookups.get(&[("layer", "global"), ("result", "hit")]), 1);
    assert_eq!(m.kv_lookups.get(&[("layer", "region"), ("result", "miss")]), 1);
    assert_eq!(m.kv_lookups.get(&[("result", "error"), ("layer", "service")]), 1);

    kv.heal("config/service/eu-2/message");
    refresh_config(&state, Trigger::Timer).await;
    assert_eq!(state.message().await, "service");
}

#[tokio::test(start_paused = true)]
async fn timer_refreshes_every_period_until_stopped() {
    let kv = Arc::new(MemoryKv::new());
    let state = state_with(kv.clone());
    let (stop_tx, stop_rx) = watch::channel(false);

    let task = tokio::spawn(run_refresh_loop(state.clone(), Duration::from_secs(30), stop_rx));

    // nothing before the first full period
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(state.metrics().refreshes.get(), 0);

    kv.put("config/global/message", "ticked");
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(state.metrics().refreshes.get(), 1);
    assert_eq!(state.message().await, "ticked");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(state.metrics().refreshes.get(), 2);

    stop_tx.send(true).unwrap();
    task.await.unwrap();

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(state.metrics().refreshes.get(), 2);
}
