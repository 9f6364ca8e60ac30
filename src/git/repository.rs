use std::path::{Path, PathBuf};

use git2::{
    DescribeFormatOptions, DescribeOptions, ErrorClass, ErrorCode, Repository as Git2Repo,
    StatusOptions,
};
use tracing::debug;

use crate::domain::describe::ABBREV_LEN;
use crate::error::Result;

const DIRTY_SUFFIX: &str = "-dirty";

/// Repository queries answered in-process by libgit2.
///
/// Discovery is deferred to each query so that a directory that is not a
/// repository can still be represented and reported as such.
pub struct Git2Repository {
    work_dir: PathBuf,
}

impl Git2Repository {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Git2Repository {
            work_dir: path.as_ref().to_path_buf(),
        }
    }

    /// Modified or staged tracked files; untracked and ignored files do not
    /// count, matching `git describe --dirty`.
    fn has_tracked_changes(repo: &Git2Repo) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        Ok(!repo.statuses(Some(&mut options))?.is_empty())
    }

    fn discover(&self) -> Option<Git2Repo> {
        match Git2Repo::discover(&self.work_dir) {
            Ok(repo) => Some(repo),
            Err(e) => {
                debug!(work_dir = %self.work_dir.display(), error = %e, "no repository found");
                None
            }
        }
    }
}

impl super::Repository for Git2Repository {
    /// libgit2 is linked in, so there is nothing to look up.
    fn tool_available(&self) -> bool {
        true
    }

    fn tool_name(&self) -> &str {
        "libgit2"
    }

    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn is_work_tree(&self) -> Result<bool> {
        Ok(self.discover().is_some_and(|repo| !repo.is_bare()))
    }

    fn describe(&self) -> Result<Option<String>> {
        let Some(repo) = self.discover() else {
            return Ok(None);
        };

        let head = match repo.head().and_then(|head| head.peel_to_commit()) {
            Ok(commit) => commit,
            Err(e) if is_no_tag(&e) => {
                debug!(error = %e, "HEAD has no commit to describe");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut options = DescribeOptions::new();
        options.describe_tags();

        let described = match head.as_object().describe(&options) {
            Ok(described) => described,
            Err(e) if is_no_tag(&e) => {
                debug!(error = %e, "libgit2 describe found no tag");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(ABBREV_LEN as u32);

        let mut raw = described.format(Some(&format))?;
        if Self::has_tracked_changes(&repo)? {
            raw.push_str(DIRTY_SUFFIX);
        }

        let raw = raw.trim();
        Ok(if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        })
    }
}

fn is_no_tag(e: &git2::Error) -> bool {
    e.class() == ErrorClass::Describe
        || matches!(e.code(), ErrorCode::NotFound | ErrorCode::UnbornBranch)
}
