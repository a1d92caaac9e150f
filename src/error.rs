use std::path::PathBuf;

use thiserror::Error;

use crate::boundary::ReleaseWarning;
use crate::pipeline::ReleaseStep;

/// Unified error type for cut-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Version '{version}' not found in {}", .path.display())]
    VersionNotFound { path: PathBuf, version: String },

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("External command failed: {0}")]
    Command(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Repository error: {0}")]
    Repository(String),

    /// A tolerated failure turned fatal by strict mode
    #[error("{warning} (step {step}, strict mode)")]
    Strict {
        step: ReleaseStep,
        warning: ReleaseWarning,
    },

    #[error("Nothing to commit: {0}")]
    NothingToCommit(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in cut-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a missing argument error naming the flag
    pub fn missing_argument(flag: impl Into<String>) -> Self {
        ReleaseError::MissingArgument(flag.into())
    }

    /// Create an external command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        ReleaseError::Command(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create an error about the state of the local repository
    pub fn repository(msg: impl Into<String>) -> Self {
        ReleaseError::Repository(msg.into())
    }

    /// Create a nothing-to-commit error with context
    pub fn nothing_to_commit(msg: impl Into<String>) -> Self {
        ReleaseError::NothingToCommit(msg.into())
    }

    pub fn version_not_found(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        ReleaseError::VersionNotFound {
            path: path.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_version_not_found_names_file_and_version() {
        let err = ReleaseError::version_not_found("Sources/Info.plist", "3.1.0");
        let msg = err.to_string();
        assert!(msg.contains("3.1.0"));
        assert!(msg.contains("Sources/Info.plist"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::missing_argument("--old"), "Missing argument"),
            (ReleaseError::command("x"), "External command failed"),
            (ReleaseError::remote("x"), "Remote operation failed"),
            (ReleaseError::repository("x"), "Repository error"),
            (ReleaseError::nothing_to_commit("x"), "Nothing to commit"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_strict_error_keeps_warning_text() {
        let err = ReleaseError::Strict {
            step: ReleaseStep::Docs,
            warning: ReleaseWarning::GitOperationFailed {
                operation: "push".to_string(),
                reason: "network down".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "git push failed: network down (step docs, strict mode)"
        );
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: ReleaseError = parse_err.into();
        assert!(err.to_string().starts_with("Invalid configuration file"));
    }
}
