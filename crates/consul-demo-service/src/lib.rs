//! consul-demo service library.
//!
//! Wires the Consul client, the layered config refresh, metrics and the HTTP
//! surface into one service. Consumed by the binary (`main.rs`) and by the
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod discovery;
pub mod lifecycle;
pub mod obs;
pub mod ops;
pub mod refresh;
pub mod router;
