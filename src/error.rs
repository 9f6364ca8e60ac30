use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for version derivation
#[derive(Error, Debug)]
pub enum VersioningError {
    #[error("The command `{program}` does not exist!")]
    ToolMissing { program: String },

    #[error("The current directory `{}` is not a git work tree!", .path.display())]
    NotARepository { path: PathBuf },

    #[error("A git tag with an semantic version is required!")]
    MissingSemverTag,

    #[error("A git tag version including plus elements is not supported! (got '{describe}')")]
    UnsupportedBuildMetadata { describe: String },

    #[error("Version '{version}' has a component larger than {}", u64::MAX)]
    VersionOutOfRange { version: String },

    #[error("Invalid CLI usage: {0}")]
    InvalidCliUsage(String),

    #[error("Version parsing error: {0}")]
    Semver(#[from] semver::Error),

    #[error("Invalid version pattern: {0}")]
    Pattern(regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-semver
pub type Result<T> = std::result::Result<T, VersioningError>;

impl VersioningError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersioningError::Config(msg.into())
    }

    /// Create a CLI usage error with context
    pub fn usage(msg: impl Into<String>) -> Self {
        VersioningError::InvalidCliUsage(msg.into())
    }

    pub fn out_of_range(version: impl Into<String>) -> Self {
        VersioningError::VersionOutOfRange {
            version: version.into(),
        }
    }

    pub fn tool_missing(program: impl Into<String>) -> Self {
        VersioningError::ToolMissing {
            program: program.into(),
        }
    }

    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        VersioningError::NotARepository { path: path.into() }
    }
}
