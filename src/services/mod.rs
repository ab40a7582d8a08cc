//! Services module - the sweep's building blocks.
//!
//! All services are framework-agnostic: they talk to the CAD application only through the
//! [`crate::host`] traits passed in as explicit arguments, so each one can be tested with a
//! mock design.
//!
//! # Components
//!
//! - [`variants`]: expands parameter specs into the ordered cartesian product of assignments
//! - [`PathComposer`]: grouping subfolder, file name template rendering, extension handling
//! - [`ModelMutator`]: writes an assignment into the design, recompute, refresh and settle
//! - [`Exporter`]: body lookup by name and format-specific export requests
//! - [`ExportPlan`]: every file a run would write, computed without a host
//!
//! The [`crate::controller::RunController`] sequences them for every variant.

pub mod exporter;
pub mod mutator;
pub mod paths;
pub mod plan;
pub mod variants;

pub use exporter::Exporter;
pub use mutator::{ModelMutator, SettlePolicy};
pub use paths::{ComposedPath, PathComposer, ensure_directory, with_extension};
pub use plan::{ExportPlan, PlannedParameter, PlannedVariant};
pub use variants::{enumerate, variant_count};
