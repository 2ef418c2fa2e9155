//! Service identity derived from the process environment.
//!
//! Read once at startup and never changed afterwards. Empty variables are
//! treated the same as unset ones.

use crate::error::{DemoError, Result};

/// Name every instance registers under in the discovery agent.
pub const SERVICE_NAME: &str = "consul-demo-service";

pub const DEFAULT_INSTANCE: &str = "0";
pub const DEFAULT_REGION: &str = "default";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub instance: String,
    pub region: String,
    /// Advertised address; the listener itself binds all interfaces.
    pub host: String,
    pub port: u16,
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.into(),
            region: DEFAULT_REGION.into(),
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceIdentity {
    /// Derive identity from `INSTANCE`, `REGION`, `HOST` and `PORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Derive identity from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str, default: &str| -> String {
            match lookup(k) {
                Some(v) if !v.is_empty() => v,
                _ => default.to_string(),
            }
        };

        let port = match lookup("PORT") {
            Some(v) if !v.is_empty() => match v.trim().parse::<u16>() {
                Ok(0) => return Err(DemoError::Config("PORT must not be 0".into())),
                Ok(p) => p,
                Err(e) => {
                    return Err(DemoError::Config(format!(
                        "PORT must be a valid port number ({v:?}): {e}"
                    )))
                }
            },
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            instance: get("INSTANCE", DEFAULT_INSTANCE),
            region: get("REGION", DEFAULT_REGION),
            host: get("HOST", DEFAULT_HOST),
            port,
        })
    }

    /// `<region>-<instance>`, used in key paths and the greeting prefix.
    pub fn service_id(&self) -> String {
        format!("{}-{}", self.region, self.instance)
    }

    /// Registration id in the discovery agent.
    pub fn registration_id(&self) -> String {
        format!("{SERVICE_NAME}-{}", self.service_id())
    }

    /// Health check target advertised to the agent.
    pub fn liveness_url(&self) -> String {
        format!("http://{}:{}/livez", self.host, self.port)
    }
}
