// Error types for the export sweep
//
// Every host-facing call returns `Result<_, SweepError>` so the run controller can stop on the
// first failure and report exactly one diagnostic.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors reported by a CAD host implementation.
///
/// Host adapters translate whatever their SDK raises into one of these variants. An absent
/// parameter is kept distinct from a rejected expression so the caller can name the cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("no active design")]
    NoActiveDesign,

    #[error("parameter not found in design: {0}")]
    ParameterNotFound(String),

    #[error("expression rejected: {0}")]
    ExpressionRejected(String),

    #[error("{0}")]
    Failed(String),
}

/// Category of a [`SweepError`], mirroring how failures are reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    ParameterUpdate,
    BodyNotFound,
    Export,
    Host,
}

/// Fatal errors that stop an export run
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Template placeholder '{{{0}}}' has no value for this variant")]
    MissingPlaceholder(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to update parameter '{name}': {reason}")]
    ParameterUpdate { name: String, reason: HostError },

    #[error("Could not find body \"{0}\" after update")]
    BodyNotFound(String),

    #[error("Failed to export file: {file}: {reason}")]
    Export { file: String, reason: String },

    #[error("No active design found")]
    NoActiveDesign,

    #[error("Host operation failed: {0}")]
    Host(#[from] HostError),

    #[error("Failed to create output directory {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    /// The reporting category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SweepError::Configuration(_)
            | SweepError::MissingPlaceholder(_)
            | SweepError::UnsupportedFileType(_) => ErrorKind::Configuration,
            SweepError::ParameterUpdate { .. } => ErrorKind::ParameterUpdate,
            SweepError::BodyNotFound(_) => ErrorKind::BodyNotFound,
            SweepError::Export { .. } | SweepError::Io { .. } => ErrorKind::Export,
            SweepError::NoActiveDesign | SweepError::Host(_) => ErrorKind::Host,
        }
    }

    /// Message shown to the user in the abort dialog
    pub fn user_message(&self) -> String {
        format!("{}. Aborting.", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_placeholder_names_key() {
        let err = SweepError::MissingPlaceholder("missingKey".to_string());
        assert!(err.to_string().contains("{missingKey}"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_parameter_update_names_parameter() {
        let err = SweepError::ParameterUpdate {
            name: "width".to_string(),
            reason: HostError::ParameterNotFound("width".to_string()),
        };
        assert!(err.to_string().contains("'width'"));
        assert_eq!(err.kind(), ErrorKind::ParameterUpdate);
        assert!(err.user_message().ends_with("Aborting."));
    }

    #[test]
    fn test_unsupported_file_type_is_configuration() {
        let err = SweepError::UnsupportedFileType("3MF".to_string());
        assert!(err.to_string().contains("Unsupported file type"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
