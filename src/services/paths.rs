use crate::error::SweepError;
use crate::models::{FileType, ParameterAssignment, ParameterSpec, RunConfig};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use regex::Regex;
use std::fs;

/// Placeholder key holding the exported body's name
pub const BODY_NAME_KEY: &str = "bodyName";

/// Placeholder key holding every `name_value` pair joined with `-`
pub const PARAMS_KEY: &str = "params";

/// Output location for one body of one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPath {
    /// Base output directory plus the grouping subfolder, if any
    pub directory: Utf8PathBuf,

    /// Rendered file name, extension included
    pub file_name: String,
}

impl ComposedPath {
    pub fn full_path(&self) -> Utf8PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Derives output folders and file names from a parameter assignment.
///
/// Composition is a pure function of its inputs: the same assignment, body and
/// configuration always give byte-identical paths.
pub struct PathComposer {
    /// Matches `{placeholder}` tokens and the `{{`/`}}` literal brace escapes
    placeholder_pattern: Regex,
}

impl PathComposer {
    pub fn new() -> Self {
        Self {
            placeholder_pattern: Regex::new(r"\{\{|\}\}|\{([^{}]*)\}")
                .expect("Invalid placeholder regex"),
        }
    }

    /// Name of the grouping subfolder for an assignment.
    ///
    /// One `name-value` segment per grouping parameter, in declaration order, joined with
    /// `-` into a single folder name. Empty when no parameter groups.
    pub fn folder_name(&self, specs: &[ParameterSpec], assignment: &ParameterAssignment) -> String {
        specs
            .iter()
            .filter(|spec| spec.grouping)
            .filter_map(|spec| {
                assignment
                    .get(&spec.name)
                    .map(|value| format!("{}-{}", spec.name, value))
            })
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Directory a variant's files are written to
    pub fn directory(
        &self,
        base_dir: &Utf8Path,
        specs: &[ParameterSpec],
        assignment: &ParameterAssignment,
    ) -> Utf8PathBuf {
        let folder = self.folder_name(specs, assignment);
        if folder.is_empty() {
            base_dir.to_path_buf()
        } else {
            base_dir.join(folder)
        }
    }

    /// Render a file name template for one body.
    ///
    /// Placeholders may name any swept parameter, `bodyName` or `params`. Anything else is a
    /// configuration error naming the offending placeholder. `{{` and `}}` render as literal
    /// braces.
    pub fn render_file_name(
        &self,
        template: &str,
        assignment: &ParameterAssignment,
        body_name: &str,
    ) -> Result<String, SweepError> {
        let mut context: IndexMap<&str, String> = assignment
            .iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        context.insert(BODY_NAME_KEY, body_name.to_string());
        context.insert(PARAMS_KEY, assignment.params_label());

        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;

        for captures in self.placeholder_pattern.captures_iter(template) {
            let token = captures.get(0).expect("capture group 0 always matches");

            let value = match captures.get(1) {
                Some(key) => context
                    .get(key.as_str())
                    .map(String::as_str)
                    .ok_or_else(|| SweepError::MissingPlaceholder(key.as_str().to_string()))?,
                None if token.as_str() == "{{" => "{",
                None => "}",
            };

            rendered.push_str(&template[last..token.start()]);
            rendered.push_str(value);
            last = token.end();
        }
        rendered.push_str(&template[last..]);

        Ok(rendered)
    }

    /// Full output location for one body of one variant
    pub fn compose(
        &self,
        base_dir: &Utf8Path,
        config: &RunConfig,
        assignment: &ParameterAssignment,
        body_name: &str,
    ) -> Result<ComposedPath, SweepError> {
        let options = &config.export_options;
        let rendered =
            self.render_file_name(&options.file_name_template, assignment, body_name)?;

        Ok(ComposedPath {
            directory: self.directory(base_dir, &config.parameters, assignment),
            file_name: with_extension(&rendered, &options.file_type),
        })
    }
}

impl Default for PathComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the file type's extension unless the name already ends with it (any case)
pub fn with_extension(file_name: &str, file_type: &FileType) -> String {
    match file_type.extension() {
        Some(ext) => {
            let suffix = format!(".{}", ext);
            if file_name.to_ascii_lowercase().ends_with(&suffix) {
                file_name.to_string()
            } else {
                format!("{}{}", file_name, suffix)
            }
        }
        None => file_name.to_string(),
    }
}

/// Create a directory and its parents. An existing directory is not an error.
pub fn ensure_directory(dir: &Utf8Path) -> Result<(), SweepError> {
    fs::create_dir_all(dir).map_err(|source| SweepError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::debug!("Ensured output directory: {}", dir);
    Ok(())
}
