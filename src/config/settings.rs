use crate::services::SettlePolicy;
use anyhow::{Context, Result};
use camino::Utf8Path;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Base name of the optional settings file in the working directory
pub const SETTINGS_FILE_NAME: &str = "variant-export";

/// Prefix of environment variables overriding settings, e.g. `VARIANT_EXPORT_DEBUG=true`
pub const ENV_PREFIX: &str = "VARIANT_EXPORT";

/// Application settings, independent of any single run configuration.
///
/// Layered with the `config` crate: defaults, then `variant-export.{toml,json,yaml}` if it
/// exists, then `VARIANT_EXPORT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Fixed wait after recompute for hosts without a stability signal
    pub settle_delay_ms: u64,

    /// Upper bound when polling a host stability signal
    pub settle_max_wait_ms: u64,

    pub settle_poll_interval_ms: u64,

    pub log_dir: String,

    pub debug: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let settle = SettlePolicy::default();
        Self {
            settle_delay_ms: settle.delay.as_millis() as u64,
            settle_max_wait_ms: settle.max_wait.as_millis() as u64,
            settle_poll_interval_ms: settle.poll_interval.as_millis() as u64,
            log_dir: "logs".to_string(),
            debug: false,
        }
    }
}

impl AppSettings {
    /// Load settings from the working directory and the environment
    pub fn load() -> Result<Self> {
        Self::build(File::with_name(SETTINGS_FILE_NAME).required(false))
    }

    /// Load settings from an explicit file, which must exist
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        Self::build(File::from(path.as_std_path()).required(true))
            .with_context(|| format!("Failed to load settings from {}", path))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read application settings")?
            .try_deserialize()
            .context("Invalid application settings")
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        SettlePolicy {
            delay: Duration::from_millis(self.settle_delay_ms),
            max_wait: Duration::from_millis(self.settle_max_wait_ms),
            poll_interval: Duration::from_millis(self.settle_poll_interval_ms),
        }
    }
}
