//! Host capability interface.
//!
//! The CAD application that owns the live design (geometry kernel, tessellation, file
//! encoders, dialogs) is reached only through the traits in this module. The sweep logic is
//! generic over them so it can be driven by a real host adapter or by a fake in tests.
//!
//! - [`Design`]: parameters, recompute, body traversal and export of the active design
//! - [`ProgressIndicator`]: cancellable progress display with a pollable cancel flag
//! - [`Dialogs`]: blocking message box and native file picker
//!
//! [`NativeDialogs`] implements [`Dialogs`] with the `rfd` crate.

pub mod native;

pub use native::NativeDialogs;

use crate::error::HostError;
use crate::models::StlQuality;
use camino::{Utf8Path, Utf8PathBuf};

/// Opaque reference to a solid body owned by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    /// Host-assigned token identifying the body
    pub id: u64,
    pub name: String,
}

/// A design component and the solid bodies it owns, in host traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub bodies: Vec<BodyHandle>,
}

/// Mesh refinement setting passed to the host's STL exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRefinement {
    Low,
    Medium,
    High,
}

impl From<StlQuality> for MeshRefinement {
    fn from(quality: StlQuality) -> Self {
        match quality {
            StlQuality::Low => MeshRefinement::Low,
            StlQuality::Medium => MeshRefinement::Medium,
            StlQuality::High => MeshRefinement::High,
        }
    }
}

/// Format-specific export request handed to [`Design::export`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostExportOptions {
    Stl {
        body: BodyHandle,
        filename: Utf8PathBuf,
        refinement: MeshRefinement,
    },
    Step {
        body: BodyHandle,
        filename: Utf8PathBuf,
    },
    Iges {
        body: BodyHandle,
        filename: Utf8PathBuf,
    },
}

impl HostExportOptions {
    pub fn body(&self) -> &BodyHandle {
        match self {
            HostExportOptions::Stl { body, .. }
            | HostExportOptions::Step { body, .. }
            | HostExportOptions::Iges { body, .. } => body,
        }
    }

    pub fn filename(&self) -> &Utf8Path {
        match self {
            HostExportOptions::Stl { filename, .. }
            | HostExportOptions::Step { filename, .. }
            | HostExportOptions::Iges { filename, .. } => filename,
        }
    }
}

/// The active parametric design of the host application.
///
/// All calls happen on the host's single automation thread, one at a time.
#[cfg_attr(test, mockall::automock)]
pub trait Design {
    /// Whether the host currently has an active design to operate on
    fn is_active(&self) -> bool;

    /// All components of the design with their solid bodies, in traversal order
    fn components(&self) -> Result<Vec<Component>, HostError>;

    /// Current value expression of a user parameter.
    ///
    /// Returns [`HostError::ParameterNotFound`] when the design has no such parameter.
    fn parameter_expression(&self, name: &str) -> Result<String, HostError>;

    fn set_parameter_expression(&mut self, name: &str, expression: &str) -> Result<(), HostError>;

    /// Request a full recompute. May complete asynchronously with respect to export.
    fn recompute(&mut self) -> Result<(), HostError>;

    fn refresh_view(&mut self);

    /// Whether regenerated geometry is ready to be exported.
    ///
    /// `None` means the host has no such signal and a fixed settle delay is used instead.
    fn is_stable(&self) -> Option<bool>;

    /// Let the host process pending UI and cancellation events
    fn process_events(&mut self);

    fn export(&mut self, options: &HostExportOptions) -> Result<(), HostError>;
}

/// Cancellable progress display
#[cfg_attr(test, mockall::automock)]
pub trait ProgressIndicator {
    fn show(&mut self, title: &str, message: &str, min: usize, max: usize);

    fn set_message(&mut self, message: &str);

    fn set_value(&mut self, value: usize);

    /// Polled once per iteration boundary
    fn was_cancelled(&self) -> bool;

    fn hide(&mut self);
}

/// Blocking user dialogs
#[cfg_attr(test, mockall::automock)]
pub trait Dialogs {
    fn message_box(&self, title: &str, message: &str);

    /// Ask the user for a file. `None` when the user declined.
    fn pick_file(
        &self,
        title: &str,
        filter_name: &str,
        extensions: &[&'static str],
        initial_directory: Option<Utf8PathBuf>,
    ) -> Option<Utf8PathBuf>;
}

impl<T: Design + ?Sized> Design for &mut T {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn components(&self) -> Result<Vec<Component>, HostError> {
        (**self).components()
    }

    fn parameter_expression(&self, name: &str) -> Result<String, HostError> {
        (**self).parameter_expression(name)
    }

    fn set_parameter_expression(&mut self, name: &str, expression: &str) -> Result<(), HostError> {
        (**self).set_parameter_expression(name, expression)
    }

    fn recompute(&mut self) -> Result<(), HostError> {
        (**self).recompute()
    }

    fn refresh_view(&mut self) {
        (**self).refresh_view()
    }

    fn is_stable(&self) -> Option<bool> {
        (**self).is_stable()
    }

    fn process_events(&mut self) {
        (**self).process_events()
    }

    fn export(&mut self, options: &HostExportOptions) -> Result<(), HostError> {
        (**self).export(options)
    }
}

impl<T: ProgressIndicator + ?Sized> ProgressIndicator for &mut T {
    fn show(&mut self, title: &str, message: &str, min: usize, max: usize) {
        (**self).show(title, message, min, max)
    }

    fn set_message(&mut self, message: &str) {
        (**self).set_message(message)
    }

    fn set_value(&mut self, value: usize) {
        (**self).set_value(value)
    }

    fn was_cancelled(&self) -> bool {
        (**self).was_cancelled()
    }

    fn hide(&mut self) {
        (**self).hide()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_refinement_from_quality() {
        assert_eq!(MeshRefinement::from(StlQuality::Low), MeshRefinement::Low);
        assert_eq!(MeshRefinement::from(StlQuality::Medium), MeshRefinement::Medium);
        assert_eq!(MeshRefinement::from(StlQuality::High), MeshRefinement::High);
    }

    #[test]
    fn test_export_options_accessors() {
        let body = BodyHandle {
            id: 7,
            name: "Shell".to_string(),
        };
        let options = HostExportOptions::Step {
            body: body.clone(),
            filename: Utf8PathBuf::from("out/Shell.step"),
        };

        assert_eq!(options.body(), &body);
        assert_eq!(options.filename(), Utf8Path::new("out/Shell.step"));
    }
}
