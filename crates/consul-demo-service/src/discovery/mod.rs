//! Discovery agent and key-value store seams.
//!
//! `KvStore` and `ServiceRegistry` are what the refresh loop and the lifecycle
//! talk to. `ConsulClient` implements both against a live agent; the `memory`
//! module provides in-process stand-ins.

pub mod consul;
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use consul_demo_core::error::Result;
use consul_demo_core::identity::{ServiceIdentity, SERVICE_NAME};

use crate::config::{agent_duration, CheckSection};

pub use consul::ConsulClient;
pub use memory::{MemoryKv, RecordingRegistry, RegistryEvent};

/// Read-only access to the key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;
}

/// Service catalog operations on the local agent.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    async fn register(&self, reg: &Registration) -> Result<()>;
    async fn deregister(&self, id: &str) -> Result<()>;
}

/// Agent service registration payload (`/v1/agent/service/register`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Registration {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub tags: Vec<String>,
    pub check: HttpCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HttpCheck {
    #[serde(rename = "HTTP")]
    pub http: String,
    pub interval: String,
    pub timeout: String,
}

impl Registration {
    /// Entry advertising `identity` with a liveness check on `/livez`.
    pub fn for_identity(identity: &ServiceIdentity, check: &CheckSection) -> Self {
        Self {
            id: identity.registration_id(),
            name: SERVICE_NAME.to_string(),
            address: identity.host.clone(),
            port: identity.port,
            tags: vec!["prometheus".to_string()],
            check: HttpCheck {
                http: identity.liveness_url(),
                interval: agent_duration(check.interval),
                timeout: agent_duration(check.timeout),
            },
        }
    }
}
