use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, VersioningError};

/// Based on https://semver.org/#semantic-versioning-200, with an optional
/// leading `v` to match git tags. The build-metadata group is kept so that
/// `+` can be reported as unsupported rather than as a malformed tag.
const GIT_SEMVER_PATTERN: &str = r"^v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$";

/// Leading numeric components, used by the lenient `next` parser.
const LEADING_CORE_PATTERN: &str = r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?";

const DIRTY_SUFFIX: &str = "-dirty";

type CompiledPattern = std::result::Result<Regex, regex::Error>;

fn compiled(cell: &'static OnceLock<CompiledPattern>, pattern: &str) -> Result<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| VersioningError::Pattern(e.clone()))
}

fn git_semver_regex() -> Result<&'static Regex> {
    static RE: OnceLock<CompiledPattern> = OnceLock::new();
    compiled(&RE, GIT_SEMVER_PATTERN)
}

fn leading_core_regex() -> Result<&'static Regex> {
    static RE: OnceLock<CompiledPattern> = OnceLock::new();
    compiled(&RE, LEADING_CORE_PATTERN)
}

/// Validate a raw describe string against the supported version grammar.
///
/// A `+` anywhere is rejected as build metadata before the grammar is
/// consulted, so `1.0.2+gold` and `1.0.2+gold-3-g0123abcd` both report the
/// same error.
pub fn validate_git_semver(raw: &str) -> Result<()> {
    if raw.contains('+') {
        return Err(VersioningError::UnsupportedBuildMetadata {
            describe: raw.to_string(),
        });
    }

    if !git_semver_regex()?.is_match(raw) {
        return Err(VersioningError::MissingSemverTag);
    }

    Ok(())
}

/// Semantic version as derived from a checkout.
///
/// `dirty` is carried separately from the pre-release identifiers and is
/// rendered as a trailing `-dirty`, which is how the describe query marks
/// a modified working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<String>,
    pub dirty: bool,
}

impl SemVer {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemVer {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            dirty: false,
        }
    }

    /// Parse a strict version string (optional `v`, no build metadata).
    pub fn parse(input: &str) -> Result<Self> {
        validate_git_semver(input)?;

        let clean = input.strip_prefix('v').unwrap_or(input);
        let (body, dirty) = match clean.strip_suffix(DIRTY_SUFFIX) {
            Some(body) => (body, true),
            None => (clean, false),
        };

        let (core, prerelease) = match body.split_once('-') {
            Some((core, pre)) => (core, pre.split('.').map(str::to_string).collect()),
            None => (body, Vec::new()),
        };

        // The grammar already guarantees digits, so a failed parse is overflow.
        let mut numbers = core
            .split('.')
            .map(|part| part.parse::<u64>().map_err(|_| VersioningError::out_of_range(input)));
        let mut next_number = || {
            numbers
                .next()
                .unwrap_or(Err(VersioningError::MissingSemverTag))
        };

        Ok(SemVer {
            major: next_number()?,
            minor: next_number()?,
            patch: next_number()?,
            prerelease,
            dirty,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// The clean release this version would become after `bump_type`.
    ///
    /// # Errors
    /// * `VersionOutOfRange` - the bumped component is already `u64::MAX`
    pub fn bump(&self, bump_type: BumpType) -> Result<Self> {
        let increment = |n: u64| {
            n.checked_add(1)
                .ok_or_else(|| VersioningError::out_of_range(self.to_string()))
        };

        Ok(match bump_type {
            BumpType::Major => SemVer::new(increment(self.major)?, 0, 0),
            BumpType::Minor => SemVer::new(self.major, increment(self.minor)?, 0),
            BumpType::Patch => SemVer::new(self.major, self.minor, increment(self.patch)?),
        })
    }

    /// Convert to a `semver::Version` for ordering and comparison.
    ///
    /// The dirty marker becomes a trailing `dirty` pre-release identifier
    /// glued on with `-`, matching the rendered string.
    pub fn to_semver(&self) -> Result<semver::Version> {
        Ok(semver::Version::parse(&self.to_string())?)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.is_prerelease() {
            write!(f, "-{}", self.prerelease.join("."))?;
        }
        if self.dirty {
            f.write_str(DIRTY_SUFFIX)?;
        }
        Ok(())
    }
}

impl FromStr for SemVer {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        SemVer::parse(s)
    }
}

/// Version bump type requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpType {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpType::Major),
            "minor" => Ok(BumpType::Minor),
            "patch" => Ok(BumpType::Patch),
            other => Err(VersioningError::usage(format!(
                "'{}' is not a bump type, expected one of: major, minor, patch",
                other
            ))),
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpType::Major => write!(f, "major"),
            BumpType::Minor => write!(f, "minor"),
            BumpType::Patch => write!(f, "patch"),
        }
    }
}

/// Leniently read `MAJOR.MINOR.PATCH` from the start of `input`.
///
/// Absent components become 0. Returns the version and whether any
/// component had to be defaulted.
///
/// # Errors
/// * `VersionOutOfRange` - a component is present but does not fit in `u64`
pub fn parse_leading_core(input: &str) -> Result<(SemVer, bool)> {
    let Some(captures) = leading_core_regex()?.captures(input.trim()) else {
        return Ok((SemVer::new(0, 0, 0), true));
    };

    let mut defaulted = false;
    let mut core = [0u64; 3];
    for (idx, slot) in core.iter_mut().enumerate() {
        match captures.get(idx + 1) {
            Some(m) => {
                *slot = m
                    .as_str()
                    .parse()
                    .map_err(|_| VersioningError::out_of_range(input))?
            }
            None => defaulted = true,
        }
    }

    let [major, minor, patch] = core;
    Ok((SemVer::new(major, minor, patch), defaulted))
}
