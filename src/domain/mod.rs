//! Domain logic - pure version rules independent of git operations

pub mod describe;
pub mod version;

pub use describe::RepoDescribe;
pub use version::{BumpType, SemVer};
