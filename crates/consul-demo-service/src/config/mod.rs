//! Service config loader.
//!
//! Identity comes from the environment (see `consul_demo_core::identity`).
//! Everything else has a default and can be tuned with an optional YAML file
//! (strict parsing) named by `CONSUL_DEMO_CONFIG`.

pub mod agent;
pub mod schema;

use std::fs;

use consul_demo_core::error::{DemoError, Result};

pub use agent::AgentConfig;
pub use schema::{agent_duration, CheckSection, ServiceConfig, ServiceSection};

/// Env var naming the optional YAML tuning file.
pub const CONFIG_PATH_ENV: &str = "CONSUL_DEMO_CONFIG";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| DemoError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| DemoError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the file named by `CONSUL_DEMO_CONFIG`, or defaults when unset.
pub fn load_from_env() -> Result<ServiceConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_from_file(&path),
        _ => Ok(ServiceConfig::default()),
    }
}
