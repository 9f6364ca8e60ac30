pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod resolver;
pub mod ui;

pub use domain::{BumpType, RepoDescribe, SemVer};
pub use error::{Result, VersioningError};
pub use resolver::{next_version, VersionResolver};
