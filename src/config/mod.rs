use crate::models::{RunConfig, RunConfigFile};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

pub mod settings;

pub use settings::AppSettings;

/// Supported encodings of a run configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension. Anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Loads the run configuration selected by the user.
///
/// The configuration file's directory is the anchor for the output tree:
/// `<config dir>/<outputDirectory>/<grouping folder>/<file>`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: Utf8PathBuf,
    config_dir: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager for the given run configuration file
    pub fn new<P: AsRef<Utf8Path>>(config_path: P) -> Self {
        let config_path = config_path.as_ref().to_path_buf();
        let config_dir = config_path
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_default();

        Self {
            config_path,
            config_dir,
        }
    }

    /// Read, parse and validate the run configuration
    pub fn load_run_config(&self) -> Result<RunConfig> {
        let file_contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read run config: {}", self.config_path))?;

        let file = self.parse(&file_contents)?;
        let config = RunConfig::try_from(file)
            .with_context(|| format!("Invalid run config: {}", self.config_path))?;

        tracing::info!(
            "Loaded run config from {}: {} parameters, {} bodies, {} export",
            self.config_path,
            config.parameters.len(),
            config.bodies_to_export.len(),
            config.export_options.file_type
        );
        Ok(config)
    }

    /// Parse configuration text in this manager's format
    pub fn parse(&self, contents: &str) -> Result<RunConfigFile> {
        let file = match ConfigFormat::from_path(&self.config_path) {
            ConfigFormat::Json => serde_json::from_str(contents)
                .with_context(|| format!("Failed to parse run config: {}", self.config_path))?,
            ConfigFormat::Yaml => serde_yaml_ng::from_str(contents)
                .with_context(|| format!("Failed to parse run config: {}", self.config_path))?,
        };
        Ok(file)
    }

    /// Base directory all exports of `config` are written below
    pub fn output_dir(&self, config: &RunConfig) -> Utf8PathBuf {
        self.config_dir.join(&config.output_directory)
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
