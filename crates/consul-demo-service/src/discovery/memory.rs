//! In-process `KvStore` / `ServiceRegistry` implementations.
//!
//! Used by the integration tests and handy for running the service without an
//! agent. Keys can be marked as failing to simulate store errors.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::{DashMap, DashSet};

use consul_demo_core::error::{DemoError, Result};

use super::{KvStore, Registration, ServiceRegistry};

#[derive(Debug, Default)]
pub struct MemoryKv {
    values: DashMap<String, Bytes>,
    failing: DashSet<String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, value: impl Into<Bytes>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn delete(&self, key: &str) {
        self.values.remove(key);
    }

    /// Make every read of `key` fail until `heal` is called.
    pub fn fail(&self, key: &str) {
        self.failing.insert(key.to_string());
    }

    pub fn heal(&self, key: &str) {
        self.failing.remove(key);
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        if self.failing.contains(key) {
            return Err(DemoError::Consul(format!("kv get failed: {key}")));
        }
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered(Registration),
    Deregistered(String),
}

/// Registry that remembers every call in order.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    events: Mutex<Vec<RegistryEvent>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        match self.events.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, ev: RegistryEvent) {
        match self.events.lock() {
            Ok(mut g) => g.push(ev),
            Err(poisoned) => poisoned.into_inner().push(ev),
        }
    }
}

#[async_trait]
impl ServiceRegistry for RecordingRegistry {
    async fn register(&self, reg: &Registration) -> Result<()> {
        self.record(RegistryEvent::Registered(reg.clone()));
        Ok(())
    }

    async fn deregister(&self, id: &str) -> Result<()> {
        self.record(RegistryEvent::Deregistered(id.to_string()));
        Ok(())
    }
}
