//! Version derivation from a checkout.
//!
//! [`VersionResolver`] is a thin sequence over a [`Repository`]: verify the
//! environment, run one describe query, validate and normalize its output.
//! Nothing is cached; every call re-queries the repository.

use tracing::{debug, info};

use crate::domain::describe::RepoDescribe;
use crate::domain::version::{parse_leading_core, validate_git_semver, BumpType, SemVer};
use crate::error::{Result, VersioningError};
use crate::git::Repository;

/// Derives semantic versions from the state of a repository.
pub struct VersionResolver<R: Repository> {
    repo: R,
}

impl<R: Repository> VersionResolver<R> {
    pub fn new(repo: R) -> Self {
        VersionResolver { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Fail unless the tool exists and the working directory is a work tree.
    ///
    /// # Errors
    /// * `ToolMissing` - the source-control tool is not available
    /// * `NotARepository` - the working directory is not inside a work tree
    pub fn verify_environment(&self) -> Result<()> {
        if !self.repo.tool_available() {
            return Err(VersioningError::tool_missing(self.repo.tool_name()));
        }

        if !self.repo.is_work_tree()? {
            return Err(VersioningError::not_a_repository(self.repo.work_dir()));
        }

        Ok(())
    }

    /// Run the describe query for HEAD and validate the result.
    ///
    /// # Errors
    /// * `MissingSemverTag` - no tag is reachable, or the nearest one is not
    ///   a semantic version
    /// * `UnsupportedBuildMetadata` - the describe output contains `+`
    pub fn describe(&self) -> Result<RepoDescribe> {
        self.verify_environment()?;

        let raw = self.repo.describe()?.ok_or_else(|| {
            debug!(work_dir = %self.repo.work_dir().display(), "no tag reachable from HEAD");
            VersioningError::MissingSemverTag
        })?;
        debug!(%raw, "describe output");

        validate_git_semver(&raw)?;
        Ok(RepoDescribe::parse(&raw))
    }

    /// The current version string, e.g. `1.0.2`, `1.0.2-3.g0123abcd` or
    /// `1.0.2-3.g0123abcd-dirty`.
    pub fn current_version(&self) -> Result<String> {
        let version = self.describe()?.normalized();
        info!(%version, "derived current version");
        Ok(version)
    }

    /// Structured form of [`VersionResolver::current_version`].
    pub fn current_semver(&self) -> Result<SemVer> {
        self.describe()?.to_semver()
    }

    /// The release that follows the current version for `bump_type`.
    pub fn next_version(&self, bump_type: BumpType) -> Result<String> {
        let current = self.current_version()?;
        next_version(&current, bump_type)
    }
}

/// Bump `current` and return a clean `MAJOR.MINOR.PATCH`.
///
/// Parsing is lenient: the leading numeric components are read and any that
/// are absent count as 0. Pre-release and dirty text is dropped.
///
/// # Errors
/// * `VersionOutOfRange` - a component does not fit in `u64`, or the bump
///   would overflow it
///
/// ```rust
/// use git_semver::{next_version, BumpType};
///
/// assert_eq!(next_version("1.2.3", BumpType::Patch).unwrap(), "1.2.4");
/// assert_eq!(next_version("1.2.3-5.gabcdef01", BumpType::Minor).unwrap(), "1.3.0");
/// assert_eq!(next_version("1.2.3", BumpType::Major).unwrap(), "2.0.0");
/// ```
pub fn next_version(current: &str, bump_type: BumpType) -> Result<String> {
    let (version, defaulted) = parse_leading_core(current)?;
    if defaulted {
        debug!(input = %current, "version components missing, defaulting to 0");
    }

    let next = version.bump(bump_type)?;
    debug!(from = %current, to = %next, bump = %bump_type, "computed next version");
    Ok(next.to_string())
}
