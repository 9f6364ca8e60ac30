//! Source-control query abstraction
//!
//! The resolver never talks to git directly. It asks a [Repository] three
//! questions: is the tool there, is this a work tree, and what does
//! `git describe --tags --abbrev=8 --dirty` say about HEAD.
//!
//! # Implementations
//!
//! - [command::CommandRepository]: runs the `git` executable found on an
//!   explicit search path, inside an explicit working directory
//! - [repository::Git2Repository]: answers the same queries in-process via
//!   the `git2` crate
//! - [mock::MockRepository]: canned answers for tests
//!
//! ```rust
//! # use git_semver::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_semver::Result<()> {
//! if repo.tool_available() && repo.is_work_tree()? {
//!     if let Some(raw) = repo.describe()? {
//!         println!("nearest tag: {}", raw);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod mock;
pub mod repository;

use std::path::Path;

pub use command::CommandRepository;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Common git query trait for abstraction
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` so a resolver can be handed to
/// another thread. No implementation mutates shared state.
///
/// ## Error Handling
///
/// "No" answers are values, not errors: a missing tag is `Ok(None)` and a
/// plain directory is `Ok(false)`. `Err` is reserved for failures to ask
/// the question at all (spawn failure, libgit2 error).
pub trait Repository: Send + Sync {
    /// Whether the source-control tool can be used at all.
    fn tool_available(&self) -> bool;

    /// Name of the tool, for error messages.
    fn tool_name(&self) -> &str {
        "git"
    }

    /// Directory the queries run in.
    fn work_dir(&self) -> &Path;

    /// Whether [`Repository::work_dir`] is inside a non-bare work tree.
    fn is_work_tree(&self) -> Result<bool>;

    /// Raw `git describe --tags --abbrev=8 --dirty` output for HEAD.
    ///
    /// # Returns
    /// * `Ok(Some(String))` - Describe output, trimmed
    /// * `Ok(None)` - No tag is reachable from HEAD (or HEAD is unborn)
    /// * `Err` - If the query could not be run
    fn describe(&self) -> Result<Option<String>>;
}

impl<R: Repository + ?Sized> Repository for Box<R> {
    fn tool_available(&self) -> bool {
        (**self).tool_available()
    }

    fn tool_name(&self) -> &str {
        (**self).tool_name()
    }

    fn work_dir(&self) -> &Path {
        (**self).work_dir()
    }

    fn is_work_tree(&self) -> Result<bool> {
        (**self).is_work_tree()
    }

    fn describe(&self) -> Result<Option<String>> {
        (**self).describe()
    }
}
