use std::time::Duration;

use serde::Deserialize;
use consul_demo_core::error::{DemoError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub check: CheckSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            service: ServiceSection::default(),
            check: CheckSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DemoError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.service.validate()?;
        self.check.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    /// Message served until a key-value layer provides one.
    #[serde(default = "default_message")]
    pub default_message: String,

    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            default_message: default_message(),
            refresh_interval_secs: default_refresh_interval_secs(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.refresh_interval_secs) {
            return Err(DemoError::Config(
                "service.refresh_interval_secs must be between 1 and 3600".into(),
            ));
        }
        if !(1..=120).contains(&self.shutdown_grace_secs) {
            return Err(DemoError::Config(
                "service.shutdown_grace_secs must be between 1 and 120".into(),
            ));
        }
        Ok(())
    }
}

fn default_message() -> String {
    "default".into()
}
fn default_refresh_interval_secs() -> u64 {
    30
}
fn default_shutdown_grace_secs() -> u64 {
    5
}

/// Health check timing. Accepts humantime strings (`"5s"`, `"1m30s"`,
/// `"1m 30s"`, `"500ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckSection {
    #[serde(default = "default_check_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_check_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CheckSection {
    fn default() -> Self {
        Self {
            interval: default_check_interval(),
            timeout: default_check_timeout(),
        }
    }
}

impl CheckSection {
    pub fn validate(&self) -> Result<()> {
        for (field, v) in [("check.interval", self.interval), ("check.timeout", self.timeout)] {
            if v.as_millis() == 0 {
                return Err(DemoError::Config(format!(
                    "{field} must be at least 1ms (got {})",
                    humantime::format_duration(v)
                )));
            }
        }
        Ok(())
    }
}

fn default_check_interval() -> Duration {
    Duration::from_secs(5)
}
fn default_check_timeout() -> Duration {
    Duration::from_secs(3)
}

/// Render `d` the way the agent parses durations: whole seconds as `"5s"`,
/// anything finer as milliseconds.
pub fn agent_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{ms}ms")
    }
}
