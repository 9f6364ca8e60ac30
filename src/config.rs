use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, VersioningError};
use crate::git::{CommandRepository, Git2Repository, Repository};

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "git-semver.toml";

/// Complete configuration for git-semver.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
}

/// Which implementation answers repository queries.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Run the `git` executable
    #[default]
    Command,
    /// Use the linked libgit2
    Libgit2,
}

/// Settings for talking to git.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Bare name looked up on the search path, or an absolute path.
    #[serde(default = "default_program")]
    pub program: String,

    /// Overrides the process `PATH` when looking up `program`.
    #[serde(default)]
    pub search_path: Option<String>,
}

fn default_program() -> String {
    "git".to_string()
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            backend: Backend::default(),
            program: default_program(),
            search_path: None,
        }
    }
}

impl GitConfig {
    /// Build the configured repository backend for `work_dir`.
    ///
    /// `process_path` is only consulted when no `search_path` is configured.
    pub fn repository(
        &self,
        work_dir: impl Into<PathBuf>,
        process_path: Option<OsString>,
    ) -> Box<dyn Repository> {
        let work_dir = work_dir.into();
        match self.backend {
            Backend::Command => {
                let search_path = self
                    .search_path
                    .clone()
                    .map(OsString::from)
                    .or(process_path)
                    .unwrap_or_default();
                Box::new(CommandRepository::new(
                    self.program.clone(),
                    work_dir,
                    search_path,
                ))
            }
            Backend::Libgit2 => Box::new(Git2Repository::open(work_dir)),
        }
    }

    /// Reject a `program` that would be resolved relative to some directory.
    pub fn validate(&self) -> Result<()> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 && !program.is_absolute() {
            return Err(VersioningError::config(format!(
                "`program` must be a bare command name or an absolute path (got '{}')",
                self.program
            )));
        }
        Ok(())
    }

    /// Reset the settings that choose which executable runs.
    fn drop_executable_settings(&mut self, path: &Path) {
        if self.program != default_program() || self.search_path.is_some() {
            warn!(
                path = %path.display(),
                "ignoring `program` and `search_path` from a config file inside the checkout"
            );
            self.program = default_program();
            self.search_path = None;
        }
    }
}

/// Where a configuration file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    /// Named with `--config`
    Explicit,
    /// Found in the checkout being versioned
    Checkout,
    /// Found in the user config directory
    User,
}

/// Parse configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| VersioningError::config(e.to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `git-semver.toml` in `work_dir`
/// 3. `git-semver.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// A file found in `work_dir` belongs to the checkout, so it may choose the
/// backend but its `program` and `search_path` are ignored.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, work_dir: &Path) -> Result<Config> {
    let found = match config_path {
        Some(path) => Some((path.to_path_buf(), ConfigSource::Explicit)),
        None => discover_config(work_dir),
    };

    let Some((path, source)) = found else {
        debug!("no config file found, using defaults");
        return Ok(Config::default());
    };

    debug!(path = %path.display(), ?source, "loading config");
    let text = fs::read_to_string(&path).map_err(|e| {
        VersioningError::config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let mut config = parse_config(&text).map_err(|e| match e {
        VersioningError::Config(msg) => {
            VersioningError::config(format!("Failed to parse {}: {}", path.display(), msg))
        }
        other => other,
    })?;

    if source == ConfigSource::Checkout {
        config.git.drop_executable_settings(&path);
    }
    config.git.validate()?;

    Ok(config)
}

fn discover_config(work_dir: &Path) -> Option<(PathBuf, ConfigSource)> {
    let local = work_dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some((local, ConfigSource::Checkout));
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
        .map(|path| (path, ConfigSource::User))
}
