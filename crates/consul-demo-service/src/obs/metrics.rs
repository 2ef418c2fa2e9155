//! Minimal metrics registry for the service.
//!
//! Plain counters are single atomics; labelled counters are backed by `DashMap`
//! with labels flattened into sorted key vectors for deterministic ordering.
//! Rendering follows the Prometheus text exposition format (0.0.4).

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Content type for the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn write_header(out: &mut String, name: &str, help: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} counter", name);
}

#[derive(Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help);
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self.map.entry(key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (label_str, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

fn key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct ServiceMetrics {
    pub requests_root: Counter,
    pub requests_livez: Counter,
    pub requests_refresh: Counter,
    /// Every config refresh, timer driven or requested.
    pub refreshes: Counter,
    /// Per-layer lookup outcome (`layer`, `result` = hit|miss|error).
    pub kv_lookups: CounterVec,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests_root
            .render("requests_root_total", "Number of request to / endpoint.", &mut out);
        self.requests_livez
            .render("requests_livez_total", "Number of request to /livez endpoint.", &mut out);
        self.requests_refresh
            .render("requests_refresh_total", "Number of request to /refresh endpoint.", &mut out);
        self.refreshes.render(
            "refresh_total",
            "Number of all config refreshs (time based + api).",
            &mut out,
        );
        self.kv_lookups.render(
            "kv_lookups_total",
            "Key-value lookups during config refresh by layer and result.",
            &mut out,
        );
        out
    }
}
