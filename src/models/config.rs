use crate::error::SweepError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Default placeholder template used to render export file names
pub const DEFAULT_FILE_NAME_TEMPLATE: &str = "{bodyName}-{params}";

/// Default output directory, relative to the configuration file
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "output";

/// A single variant value as written in the configuration file.
///
/// Numbers keep their original textual form (`10` stays `10`, `2.5` stays `2.5`) so that
/// expressions sent to the host and generated paths are stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Number(n) => write!(f, "{}", n),
            ParameterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Number(value.into())
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

/// Target file format of an export.
///
/// Any string is accepted when loading; formats the exporter cannot produce are kept
/// verbatim in [`FileType::Other`] and rejected when the export is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    Stl,
    Step,
    Iges,
    /// Declared by the configuration format but not supported by the exporter
    ThreeMf,
    Other(String),
}

impl FileType {
    /// Lower-case file extension for this format, if it has one
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            FileType::Stl => Some("stl"),
            FileType::Step => Some("step"),
            FileType::Iges => Some("iges"),
            FileType::ThreeMf => Some("3mf"),
            FileType::Other(_) => None,
        }
    }
}

impl From<String> for FileType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "STL" => FileType::Stl,
            "STEP" => FileType::Step,
            "IGES" => FileType::Iges,
            "3MF" => FileType::ThreeMf,
            _ => FileType::Other(value),
        }
    }
}

impl From<FileType> for String {
    fn from(value: FileType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Stl => f.write_str("STL"),
            FileType::Step => f.write_str("STEP"),
            FileType::Iges => f.write_str("IGES"),
            FileType::ThreeMf => f.write_str("3MF"),
            FileType::Other(s) => f.write_str(s),
        }
    }
}

/// STL tessellation quality
///
/// Unrecognized values fall back to [`StlQuality::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StlQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl From<String> for StlQuality {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => StlQuality::Low,
            "MEDIUM" => StlQuality::Medium,
            "HIGH" => StlQuality::High,
            _ => {
                tracing::warn!("Unknown STL quality '{}', using MEDIUM", value);
                StlQuality::Medium
            }
        }
    }
}

impl From<StlQuality> for String {
    fn from(value: StlQuality) -> Self {
        match value {
            StlQuality::Low => "LOW",
            StlQuality::Medium => "MEDIUM",
            StlQuality::High => "HIGH",
        }
        .to_string()
    }
}

/// Export settings from the `exportOptions` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default = "default_file_type")]
    pub file_type: FileType,

    #[serde(default)]
    pub stl_quality: StlQuality,

    #[serde(default = "default_force_recompute")]
    pub force_recompute: bool,

    #[serde(default = "default_file_name_template")]
    pub file_name_template: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_type: default_file_type(),
            stl_quality: StlQuality::default(),
            force_recompute: default_force_recompute(),
            file_name_template: default_file_name_template(),
        }
    }
}

fn default_file_type() -> FileType {
    FileType::Stl
}

fn default_force_recompute() -> bool {
    true
}

fn default_file_name_template() -> String {
    DEFAULT_FILE_NAME_TEMPLATE.to_string()
}

fn default_output_directory() -> String {
    DEFAULT_OUTPUT_DIRECTORY.to_string()
}

/// One entry of `parametersToIterate`, keyed by parameter name in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterEntry {
    pub variants: Vec<ParameterValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,

    #[serde(default)]
    pub grouping: bool,
}

/// On-disk layout of a run configuration (JSON or YAML)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigFile {
    #[serde(default = "default_output_directory")]
    pub output_directory: String,

    #[serde(default)]
    pub bodies_to_export: Vec<String>,

    #[serde(default)]
    pub parameters_to_iterate: IndexMap<String, ParameterEntry>,

    #[serde(default)]
    pub export_options: ExportOptions,
}

/// A parameter to sweep over
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub variants: Vec<ParameterValue>,
    pub output_name: String,
    pub grouping: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, variants: Vec<ParameterValue>, grouping: bool) -> Self {
        let name = name.into();
        Self {
            output_name: name.clone(),
            name,
            variants,
            grouping,
        }
    }
}

/// Validated configuration for one export run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub output_directory: String,
    pub bodies_to_export: Vec<String>,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterSpec>,
    pub export_options: ExportOptions,
}

impl RunConfig {
    /// Check the invariants the sweep relies on
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.output_directory.trim().is_empty() {
            return Err(SweepError::Configuration(
                "outputDirectory must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.parameters {
            if spec.name.is_empty() {
                return Err(SweepError::Configuration(
                    "parameter names must not be empty".to_string(),
                ));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(SweepError::Configuration(format!(
                    "parameter '{}' is declared more than once",
                    spec.name
                )));
            }
            if spec.variants.is_empty() {
                return Err(SweepError::Configuration(format!(
                    "parameter '{}' has no variants",
                    spec.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl TryFrom<RunConfigFile> for RunConfig {
    type Error = SweepError;

    fn try_from(file: RunConfigFile) -> Result<Self, Self::Error> {
        let parameters = file
            .parameters_to_iterate
            .into_iter()
            .map(|(name, entry)| ParameterSpec {
                output_name: entry.output_name.unwrap_or_else(|| name.clone()),
                name,
                variants: entry.variants,
                grouping: entry.grouping,
            })
            .collect();

        let config = RunConfig {
            output_directory: file.output_directory,
            bodies_to_export: file.bodies_to_export,
            parameters,
            export_options: file.export_options,
        };
        config.validate()?;
        Ok(config)
    }
}
