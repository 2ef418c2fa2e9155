//! Shared application state.
//!
//! Cloned into every handler and the refresh task. Identity and config are
//! fixed at construction; the message record is the only mutable part.

use std::sync::Arc;

use tokio::sync::RwLock;

use consul_demo_core::identity::ServiceIdentity;

use crate::config::ServiceConfig;
use crate::discovery::KvStore;
use crate::obs::ServiceMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    identity: ServiceIdentity,
    service_id: String,
    cfg: ServiceConfig,
    kv: Arc<dyn KvStore>,
    message: RwLock<String>,
    metrics: ServiceMetrics,
}

impl AppState {
    pub fn new(identity: ServiceIdentity, cfg: ServiceConfig, kv: Arc<dyn KvStore>) -> Self {
        let message = RwLock::new(cfg.service.default_message.clone());
        Self {
            inner: Arc::new(AppStateInner {
                service_id: identity.service_id(),
                identity,
                cfg,
                kv,
                message,
                metrics: ServiceMetrics::new(),
            }),
        }
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.inner.identity
    }

    /// `<region>-<instance>`, computed once.
    pub fn service_id(&self) -> &str {
        &self.inner.service_id
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn kv(&self) -> &dyn KvStore {
        self.inner.kv.as_ref()
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    /// Current display message.
    pub async fn message(&self) -> String {
        self.inner.message.read().await.clone()
    }

    pub async fn set_message(&self, message: String) {
        *self.inner.message.write().await = message;
    }
}
