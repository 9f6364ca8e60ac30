use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::domain::describe::ABBREV_LEN;
use crate::error::{Result, VersioningError};
use crate::git::Repository;

/// Repository queries answered by running the `git` executable.
///
/// The executable is looked up on `search_path` and run inside `work_dir`;
/// neither is taken from process-global state after construction.
#[derive(Debug, Clone)]
pub struct CommandRepository {
    program: String,
    work_dir: PathBuf,
    search_path: OsString,
}

impl CommandRepository {
    pub fn new(
        program: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        search_path: impl Into<OsString>,
    ) -> Self {
        CommandRepository {
            program: program.into(),
            work_dir: work_dir.into(),
            search_path: search_path.into(),
        }
    }

    /// Like [`CommandRepository::new`], with the search path captured from
    /// the process `PATH` once, here.
    pub fn with_process_path(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        let search_path = env::var_os("PATH").unwrap_or_default();
        Self::new(program, work_dir, search_path)
    }

    /// Full path of the executable that would be run, if any.
    pub fn resolve_program(&self) -> Option<PathBuf> {
        find_executable(&self.program, &self.search_path)
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        let program = self
            .resolve_program()
            .ok_or_else(|| VersioningError::tool_missing(&self.program))?;

        debug!(program = %program.display(), ?args, work_dir = %self.work_dir.display(), "running git");

        let output = Command::new(&program)
            .args(args)
            .current_dir(&self.work_dir)
            .output()?;

        debug!(status = ?output.status.code(), "git finished");
        Ok(output)
    }
}

impl Repository for CommandRepository {
    fn tool_available(&self) -> bool {
        self.resolve_program().is_some()
    }

    fn tool_name(&self) -> &str {
        &self.program
    }

    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn is_work_tree(&self) -> Result<bool> {
        if !self.work_dir.is_dir() {
            return Ok(false);
        }

        let output = self.git(&["rev-parse", "--is-inside-work-tree"])?;
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    fn describe(&self) -> Result<Option<String>> {
        let abbrev = format!("--abbrev={}", ABBREV_LEN);
        let output = self.git(&["describe", "--tags", &abbrev, "--dirty"])?;

        if !output.status.success() {
            debug!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git describe found no tag"
            );
            return Ok(None);
        }

        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if raw.is_empty() { None } else { Some(raw) })
    }
}

/// Look `program` up on `search_path` the way a shell would.
///
/// An absolute program path is checked as-is. A relative path with a
/// directory component is never run, since it would resolve against
/// whatever directory the caller happens to be in. Empty search path
/// entries are skipped rather than treated as the current directory.
pub fn find_executable(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.is_absolute() {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    if candidate.components().count() > 1 {
        debug!(%program, "refusing relative program path");
        return None;
    }

    let file_name = with_exe_suffix(program);
    env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(&file_name))
        .find(|path| is_executable(path))
}

fn with_exe_suffix(program: &str) -> String {
    let suffix = env::consts::EXE_SUFFIX;
    if suffix.is_empty() || program.ends_with(suffix) {
        program.to_string()
    } else {
        format!("{}{}", program, suffix)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
