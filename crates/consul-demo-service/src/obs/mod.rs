//! Lightweight in-process metrics (dependency-free).
//!
//! Counters are atomics owned by `ServiceMetrics`, which lives in the shared
//! application state and is rendered by the `/metrics` handler.

pub mod metrics;

pub use metrics::{Counter, CounterVec, ServiceMetrics};
