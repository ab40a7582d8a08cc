use super::{Exporter, PathComposer, enumerate};
use crate::error::SweepError;
use crate::host::BodyHandle;
use crate::models::RunConfig;
use camino::{Utf8Path, Utf8PathBuf};

/// A swept parameter as shown in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedParameter {
    /// The parameter's output name
    pub label: String,
    pub name: String,
    pub variants: Vec<String>,
    pub grouping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedVariant {
    /// `name_value` pairs of the assignment
    pub params: String,
    pub files: Vec<Utf8PathBuf>,
}

/// Every file a run of a configuration would write, computed without a host.
///
/// Built with the same path composition and export request checks as a real run, so a plan
/// that builds fails at run time only for host reasons (missing parameter or body, export
/// failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub output_dir: Utf8PathBuf,
    pub parameters: Vec<PlannedParameter>,
    pub variants: Vec<PlannedVariant>,
}

impl ExportPlan {
    pub fn build(config: &RunConfig, output_dir: &Utf8Path) -> Result<Self, SweepError> {
        config.validate()?;

        let composer = PathComposer::new();
        let exporter = Exporter::new();

        let parameters = config
            .parameters
            .iter()
            .map(|spec| PlannedParameter {
                label: spec.output_name.clone(),
                name: spec.name.clone(),
                variants: spec.variants.iter().map(ToString::to_string).collect(),
                grouping: spec.grouping,
            })
            .collect();

        let mut variants = Vec::new();
        for assignment in enumerate(&config.parameters) {
            let mut files = Vec::with_capacity(config.bodies_to_export.len());
            for body_name in &config.bodies_to_export {
                let composed = composer.compose(output_dir, config, &assignment, body_name)?;
                // Ids are assigned by the host once the body is resolved
                let body = BodyHandle {
                    id: 0,
                    name: body_name.clone(),
                };
                let request =
                    exporter.export_options(&body, &composed.full_path(), &config.export_options)?;
                files.push(request.filename().to_path_buf());
            }
            variants.push(PlannedVariant {
                params: assignment.params_label(),
                files,
            });
        }

        tracing::debug!(
            "Planned {} variants into {}",
            variants.len(),
            output_dir
        );

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            parameters,
            variants,
        })
    }

    pub fn file_count(&self) -> usize {
        self.variants.iter().map(|v| v.files.len()).sum()
    }
}
