use crate::error::SweepError;
use crate::host::{BodyHandle, Design, HostExportOptions, MeshRefinement};
use crate::models::{ExportOptions, FileType};
use camino::Utf8Path;

/// Finds bodies in the design and hands them to the host exporter.
///
/// Exports are attempted exactly once; a host failure is reported with the target file
/// name and the host's diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter;

impl Exporter {
    pub fn new() -> Self {
        Self
    }

    /// First body named exactly `name`, searching every component in host order
    pub fn resolve_body<D: Design>(&self, design: &D, name: &str) -> Result<BodyHandle, SweepError> {
        let components = design.components()?;

        components
            .into_iter()
            .flat_map(|component| component.bodies)
            .find(|body| body.name == name)
            .ok_or_else(|| SweepError::BodyNotFound(name.to_string()))
    }

    /// Build the host export request for a file type.
    ///
    /// 3MF is part of the configuration format but cannot be exported; it and any unknown
    /// type fail here before the host is called.
    pub fn export_options(
        &self,
        body: &BodyHandle,
        path: &Utf8Path,
        options: &ExportOptions,
    ) -> Result<HostExportOptions, SweepError> {
        let body = body.clone();
        let filename = path.to_path_buf();

        match &options.file_type {
            FileType::Stl => Ok(HostExportOptions::Stl {
                body,
                filename,
                refinement: MeshRefinement::from(options.stl_quality),
            }),
            FileType::Step => Ok(HostExportOptions::Step { body, filename }),
            FileType::Iges => Ok(HostExportOptions::Iges { body, filename }),
            FileType::ThreeMf => Err(SweepError::UnsupportedFileType(
                options.file_type.to_string(),
            )),
            FileType::Other(name) => Err(SweepError::UnsupportedFileType(name.clone())),
        }
    }

    /// Export one body to one file
    pub fn export<D: Design>(
        &self,
        design: &mut D,
        body: &BodyHandle,
        path: &Utf8Path,
        options: &ExportOptions,
    ) -> Result<(), SweepError> {
        let request = self.export_options(body, path, options)?;
        self.execute(design, &request)
    }

    /// Run a prepared export request through the host
    pub fn execute<D: Design>(
        &self,
        design: &mut D,
        request: &HostExportOptions,
    ) -> Result<(), SweepError> {
        let body = request.body();
        let path = request.filename();

        design.export(request).map_err(|e| {
            tracing::error!("Failed to export body {}: {}", body.name, e);
            SweepError::Export {
                file: path.file_name().unwrap_or(path.as_str()).to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::info!("Exported {} to {}", body.name, path);
        Ok(())
    }
}
