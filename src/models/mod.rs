//! Data models for variant-export.
//!
//! - [`RunConfig`]: validated run configuration (output directory, bodies, parameters, options)
//! - [`RunConfigFile`]: the on-disk JSON/YAML layout it is loaded from
//! - [`ParameterSpec`]: one swept parameter with its ordered variants
//! - [`ParameterAssignment`]: one concrete combination of parameter values
//! - [`ExportOptions`]: file type, STL quality, recompute flag, file name template
//!
//! Config structs derive `Serialize`/`Deserialize`; parameter order is preserved with
//! `IndexMap` because it decides both iteration order and path composition.

pub mod assignment;
pub mod config;

pub use assignment::ParameterAssignment;
pub use config::{
    DEFAULT_FILE_NAME_TEMPLATE, DEFAULT_OUTPUT_DIRECTORY, ExportOptions, FileType,
    ParameterEntry, ParameterSpec, ParameterValue, RunConfig, RunConfigFile, StlQuality,
};
