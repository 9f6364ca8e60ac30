use std::path::{Path, PathBuf};

use crate::error::{Result, VersioningError};
use crate::git::Repository;

/// Mock repository for testing without actual git operations
#[derive(Debug, Clone)]
pub struct MockRepository {
    tool_available: bool,
    work_tree: bool,
    work_dir: PathBuf,
    describe: Option<String>,
    fail_describe: Option<String>,
}

impl MockRepository {
    /// A work tree with git available and no tags
    pub fn new() -> Self {
        MockRepository {
            tool_available: true,
            work_tree: true,
            work_dir: PathBuf::from("/mock/checkout"),
            describe: None,
            fail_describe: None,
        }
    }

    /// Set the raw describe output returned for HEAD
    pub fn with_describe(mut self, raw: impl Into<String>) -> Self {
        self.describe = Some(raw.into());
        self
    }

    pub fn without_tool(mut self) -> Self {
        self.tool_available = false;
        self
    }

    pub fn outside_work_tree(mut self) -> Self {
        self.work_tree = false;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Make `describe` fail as if the query could not be run
    pub fn failing_describe(mut self, message: impl Into<String>) -> Self {
        self.fail_describe = Some(message.into());
        self
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn tool_available(&self) -> bool {
        self.tool_available
    }

    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn is_work_tree(&self) -> Result<bool> {
        Ok(self.work_tree)
    }

    fn describe(&self) -> Result<Option<String>> {
        if let Some(message) = &self.fail_describe {
            return Err(VersioningError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message.clone(),
            )));
        }
        Ok(self.describe.clone())
    }
}
