use std::fmt;

/// Non-fatal problems met while running a release.
///
/// A release keeps going after any of these unless strict mode is on; they
/// are shown to the user and kept in the step outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// An external program exited with a non-zero status or was killed
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },
    /// An external program could not be started at all
    CommandUnavailable { command: String, reason: String },
    /// A git operation (stage, commit, tag, push) failed
    GitOperationFailed { operation: String, reason: String },
    /// A commit was skipped because nothing changed under the staged paths
    NothingToCommit { message: String },
    /// Old and new versions are the same string
    IdenticalVersions { version: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::CommandFailed { command, exit_code } => match exit_code {
                Some(code) => write!(f, "Command '{}' exited with status {}", command, code),
                None => write!(f, "Command '{}' was terminated by a signal", command),
            },
            ReleaseWarning::CommandUnavailable { command, reason } => {
                write!(f, "Cannot run '{}': {}", command, reason)
            }
            ReleaseWarning::GitOperationFailed { operation, reason } => {
                write!(f, "git {} failed: {}", operation, reason)
            }
            ReleaseWarning::NothingToCommit { message } => {
                write!(f, "Nothing to commit for \"{}\"", message)
            }
            ReleaseWarning::IdenticalVersions { version } => {
                write!(
                    f,
                    "Old and new versions are both '{}'; files will be rewritten unchanged",
                    version
                )
            }
        }
    }
}
