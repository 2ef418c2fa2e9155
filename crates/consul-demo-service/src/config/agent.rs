//! Consul agent connection settings.
//!
//! Mirrors the environment conventions of the official Consul clients:
//! `CONSUL_HTTP_ADDR`, `CONSUL_HTTP_TOKEN`, `CONSUL_HTTP_SSL`.

use consul_demo_core::error::{DemoError, Result};

pub const DEFAULT_AGENT_ADDR: &str = "127.0.0.1:8500";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Base URL including scheme, without trailing slash.
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://{DEFAULT_AGENT_ADDR}"),
            token: None,
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("CONSUL_HTTP_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_AGENT_ADDR.to_string());

        let ssl = match lookup("CONSUL_HTTP_SSL").as_deref() {
            None | Some("") => false,
            Some(v) => parse_bool(v).ok_or_else(|| {
                DemoError::Config(format!("CONSUL_HTTP_SSL must be a boolean (got {v:?})"))
            })?,
        };

        let base_url = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr
        } else if ssl {
            format!("https://{addr}")
        } else {
            format!("http://{addr}")
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        if base_url.ends_with("://") {
            return Err(DemoError::Config("CONSUL_HTTP_ADDR has no host".into()));
        }

        Ok(Self {
            base_url,
            token: lookup("CONSUL_HTTP_TOKEN").filter(|v| !v.is_empty()),
        })
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}
