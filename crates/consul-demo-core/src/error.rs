//! Shared error type across consul-demo crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Invalid environment or config file input.
    #[error("config: {0}")]
    Config(String),
    /// Consul agent unreachable or returned an unexpected status.
    #[error("consul: {0}")]
    Consul(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl DemoError {
    /// Short label used in log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            DemoError::Config(_) => "config",
            DemoError::Consul(_) => "consul",
            DemoError::Io(_) => "io",
            DemoError::Internal(_) => "internal",
        }
    }
}
