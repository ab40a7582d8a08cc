// variant-export - Batch export of parametric CAD design variants
//
// This is the library crate containing the sweep logic and the host capability interface.
// The binary crate (main.rs) previews export plans without a CAD host.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{AppSettings, ConfigManager};
pub use controller::{RunController, RunReport};
pub use error::{ErrorKind, HostError, SweepError};
pub use models::{ExportOptions, FileType, ParameterAssignment, ParameterSpec, RunConfig};
pub use state::{RunEvent, RunState, RunStatus};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
