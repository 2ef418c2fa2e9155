#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use consul_demo_core::ServiceIdentity;
use consul_demo_service::app_state::AppState;
use consul_demo_service::config::ServiceConfig;
use consul_demo_service::discovery::MemoryKv;
use consul_demo_service::router::build_router;

fn setup() -> (AppState, Arc<MemoryKv>, Router) {
    let kv = Arc::new(MemoryKv::new());
    let identity = ServiceIdentity {
        instance: "7".into(),
        region: "ap".into(),
        ..ServiceIdentity::default()
    };
    let state = AppState::new(identity, ServiceConfig::default(), kv.clone());
    let app = build_router(state.clone());
    (state, kv, app)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn root_echoes_identity_and_message() {
    let (state, _kv, app) = setup();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[ap-7] default\n");
    assert_eq!(state.metrics().requests_root.get(), 1);
}

#[tokio::test]
async fn refresh_route_pulls_new_message() {
    let (state, kv, app) = setup();
    kv.put("config/region/ap/message", "hello asia");

    // not visible until a refresh runs
    let (_, body) = get(&app, "/").await;
    assert_eq!(body, "[ap-7] default\n");

    let (status, body) = get(&app, "/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK\n");

    let (_, body) = get(&app, "/").await;
    assert_eq!(body, "[ap-7] hello asia\n");

    let m = state.metrics();
    assert_eq!(m.requests_refresh.get(), 1);
    assert_eq!(m.refreshes.get(), 1);
    assert_eq!(m.requests_root.get(), 2);
}

#[tokio::test]
async fn livez_always_ok() {
    let (state, kv, app) = setup();
    kv.fail("config/global/message");
    kv.fail("config/region/ap/message");
    kv.fail("config/service/ap-7/message");
    let _ = get(&app, "/refresh").await;

    for _ in 0..3 {
        let (status, body) = get(&app, "/livez").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK\n");
    }
    assert_eq!(state.metrics().requests_livez.get(), 3);
}

#[tokio::test]
async fn counters_only_move_for_their_route() {
    let (state, _kv, app) = setup();
    let _ = get(&app, "/livez").await;
    let _ = get(&app, "/metrics").await;

    let m = state.metrics();
    assert_eq!(m.requests_livez.get(), 1);
    assert_eq!(m.requests_root.get(), 0);
    assert_eq!(m.requests_refresh.get(), 0);
    assert_eq!(m.refreshes.get(), 0);
}

#[tokio::test]
async fn metrics_exposition() {
    let (_state, kv, app) = setup();
    kv.put("config/global/message", "hi");
    let _ = get(&app, "/").await;
    let _ = get(&app, "/refresh").await;

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert!(ct.starts_with("text/plain; version=0.0.4"), "{ct}");

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("# TYPE requests_root_total counter"));
    assert!(text.contains("requests_root_total 1\n"));
    assert!(text.contains("requests_refresh_total 1\n"));
    assert!(text.contains("requests_livez_total 0\n"));
    assert!(text.contains("refresh_total 1\n"));
    assert!(text.contains("kv_lookups_total{layer=\"global\",result=\"hit\"} 1\n"));
    assert!(text.contains("kv_lookups_total{layer=\"service\",result=\"miss\"} 1\n"));
}

#[tokio::test]
async fn unknown_paths_greet_like_root() {
    let (state, _kv, app) = setup();
    let (status, body) = get(&app, "/anything/else").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[ap-7] default\n");
    assert_eq!(state.metrics().requests_root.get(), 1);
}

#[tokio::test]
async fn routes_accept_any_method() {
    let (state, kv, app) = setup();
    kv.put("config/global/message", "posted");

    for (method, uri, expected) in [
        ("POST", "/refresh", "OK\n"),
        ("PUT", "/livez", "OK\n"),
        ("POST", "/", "[ap-7] posted\n"),
    ] {
        let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{method} {uri}");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), expected);
    }

    let m = state.metrics();
    assert_eq!(m.requests_refresh.get(), 1);
    assert_eq!(m.requests_livez.get(), 1);
    assert_eq!(m.requests_root.get(), 1);
}
