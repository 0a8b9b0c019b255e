//! Application configuration model.
//!
//! Loaded from `config.toml`; every section and field is optional and falls
//! back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PaddockError, Result};
use crate::session::{ExpiryPolicy, SessionDuration};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PaddockConfig {
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

impl PaddockConfig {
    /// Checks the values serde cannot constrain on its own.
    pub fn validate(&self) -> Result<()> {
        SessionDuration::try_from(self.session.default_duration_minutes)
            .map_err(|e| PaddockError::config(format!("session.default_duration_minutes: {e}")))?;
        if self.polling.session_interval_secs == 0
            || self.polling.dashboard_interval_secs == 0
            || self.polling.tick_interval_ms == 0
        {
            return Err(PaddockError::config("polling intervals must be positive"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub default_duration_minutes: u32,
    pub expiry_policy: ExpiryPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: SessionDuration::default().minutes(),
            expiry_policy: ExpiryPolicy::Manual,
        }
    }
}

/// Cadences of the client-side polling loop.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PollingConfig {
    /// Session snapshot refresh
    pub session_interval_secs: u64,
    /// Daily mode and eligibility refresh
    pub dashboard_interval_secs: u64,
    /// Local countdown recomputation
    pub tick_interval_ms: u64,
}

impl PollingConfig {
    pub fn session_interval(&self) -> Duration {
        Duration::from_secs(self.session_interval_secs)
    }

    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_interval_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            session_interval_secs: 15,
            dashboard_interval_secs: 30,
            tick_interval_ms: 1_000,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Also write a daily rolling log under `<data_dir>/logs`
    pub log_to_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            log_to_file: false,
        }
    }
}
