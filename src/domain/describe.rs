//! Tokenizer for `git describe --tags --abbrev=8 --dirty` output.
//!
//! git joins its positional fields with `-`, which collides with the `-`
//! that introduces a semver pre-release. The output is therefore read from
//! the right, where the layout is fixed:
//!
//! ```text
//! <tag>[-<commits>-g<8 hex>][-dirty]
//! ```
//!
//! Anything left of the commit count belongs to the tag, including any
//! pre-release text the tag itself carries.

use std::fmt;

use super::version::SemVer;
use crate::error::Result;

/// Length of the abbreviated object name requested from git.
pub const ABBREV_LEN: usize = 8;

const DIRTY_SUFFIX: &str = "-dirty";

/// Structured form of a describe query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescribe {
    /// Nearest reachable tag, verbatim (may carry a `v` prefix).
    pub tag: String,
    pub commits_since_tag: u32,
    /// Abbreviated hash of HEAD; `None` when the tag points at HEAD.
    pub short_hash: Option<String>,
    pub working_tree_dirty: bool,
}

impl RepoDescribe {
    /// Split raw describe output into its fields.
    ///
    /// Never fails: output that does not end in a `-<digits>-g<hash>`
    /// suffix is treated as a tag sitting exactly at HEAD.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (body, working_tree_dirty) = match raw.strip_suffix(DIRTY_SUFFIX) {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        match split_distance(body) {
            Some((tag, commits_since_tag, hash)) => RepoDescribe {
                tag: tag.to_string(),
                commits_since_tag,
                short_hash: Some(hash.to_string()),
                working_tree_dirty,
            },
            None => RepoDescribe {
                tag: body.to_string(),
                commits_since_tag: 0,
                short_hash: None,
                working_tree_dirty,
            },
        }
    }

    /// The tag with a single leading `v` removed.
    pub fn tag_version(&self) -> &str {
        self.tag.strip_prefix('v').unwrap_or(&self.tag)
    }

    /// Render as a version string with the distance dot-joined into the
    /// pre-release:
    ///
    /// - `1.0.2-3-g0123abcd`       → `1.0.2-3.g0123abcd`
    /// - `1.0.2-rc.1-3-g0123abcd`  → `1.0.2-rc.1.3.g0123abcd`
    /// - `1.0.2-dirty`             → `1.0.2-dirty`
    pub fn normalized(&self) -> String {
        let mut out = self.tag_version().to_string();
        if let Some(hash) = &self.short_hash {
            let separator = if has_prerelease(self.tag_version()) {
                '.'
            } else {
                '-'
            };
            out.push(separator);
            out.push_str(&format!("{}.g{}", self.commits_since_tag, hash));
        }
        if self.working_tree_dirty {
            out.push_str(DIRTY_SUFFIX);
        }
        out
    }

    /// Structured version of [`RepoDescribe::normalized`].
    pub fn to_semver(&self) -> Result<SemVer> {
        SemVer::parse(&self.normalized())
    }
}

impl fmt::Display for RepoDescribe {
    /// Renders the way git prints it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        if let Some(hash) = &self.short_hash {
            write!(f, "-{}-g{}", self.commits_since_tag, hash)?;
        }
        if self.working_tree_dirty {
            f.write_str(DIRTY_SUFFIX)?;
        }
        Ok(())
    }
}

/// Peel `-<digits>-g<hash>` off the right of `body`.
fn split_distance(body: &str) -> Option<(&str, u32, &str)> {
    let (rest, hash_token) = body.rsplit_once('-')?;
    let hash = hash_token.strip_prefix('g')?;
    if hash.len() != ABBREV_LEN || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let (tag, count_token) = rest.rsplit_once('-')?;
    if tag.is_empty() || count_token.is_empty() || !count_token.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let commits = count_token.parse::<u32>().ok()?;

    Some((tag, commits, hash))
}

/// A version core never contains `-`, so any dash marks a pre-release.
fn has_prerelease(version: &str) -> bool {
    version.contains('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_tag() {
        let d = RepoDescribe::parse("v1.0.2");
        assert_eq!(d.tag, "v1.0.2");
        assert_eq!(d.commits_since_tag, 0);
        assert_eq!(d.short_hash, None);
        assert!(!d.working_tree_dirty);
        assert_eq!(d.normalized(), "1.0.2");
    }

    #[test]
    fn test_parse_exact_tag_dirty() {
        let d = RepoDescribe::parse("v1.0.2-dirty");
        assert_eq!(d.tag, "v1.0.2");
        assert!(d.working_tree_dirty);
        assert_eq!(d.normalized(), "1.0.2-dirty");
    }

    #[test]
    fn test_parse_commits_since_tag() {
        let d = RepoDescribe::parse("v1.0.2-3-g0123abcd\n");
        assert_eq!(d.tag, "v1.0.2");
        assert_eq!(d.commits_since_tag, 3);
        assert_eq!(d.short_hash.as_deref(), Some("0123abcd"));
        assert!(!d.working_tree_dirty);
        assert_eq!(d.normalized(), "1.0.2-3.g0123abcd");
    }

    #[test]
    fn test_parse_commits_since_tag_dirty() {
        let d = RepoDescribe::parse("1.0.2-12-gdeadbeef-dirty");
        assert_eq!(d.commits_since_tag, 12);
        assert!(d.working_tree_dirty);
        assert_eq!(d.normalized(), "1.0.2-12.gdeadbeef-dirty");
    }

    #[test]
    fn test_tag_prerelease_is_dot_joined() {
        let d = RepoDescribe::parse("v2.0.0-rc.1-4-gcafef00d");
        assert_eq!(d.tag, "v2.0.0-rc.1");
        assert_eq!(d.normalized(), "2.0.0-rc.1.4.gcafef00d");

        let d = RepoDescribe::parse("v2.0.0-beta-4-gcafef00d-dirty");
        assert_eq!(d.normalized(), "2.0.0-beta.4.gcafef00d-dirty");
    }

    #[test]
    fn test_tag_prerelease_with_dashes_stays_in_tag() {
        let d = RepoDescribe::parse("1.0.0-pre-release-2-g0123abcd");
        assert_eq!(d.tag, "1.0.0-pre-release");
        assert_eq!(d.normalized(), "1.0.0-pre-release.2.g0123abcd");
    }

    #[test]
    fn test_exact_prerelease_tag_untouched() {
        let d = RepoDescribe::parse("1.0.0-rc.1");
        assert_eq!(d.short_hash, None);
        assert_eq!(d.normalized(), "1.0.0-rc.1");
    }

    #[test]
    fn test_wrong_hash_length_is_not_a_suffix() {
        let d = RepoDescribe::parse("1.0.0-3-g0123abc");
        assert_eq!(d.short_hash, None);
        assert_eq!(d.tag, "1.0.0-3-g0123abc");
    }

    #[test]
    fn test_non_hex_hash_is_not_a_suffix() {
        let d = RepoDescribe::parse("1.0.0-3-gzzzzzzzz");
        assert_eq!(d.short_hash, None);
    }

    #[test]
    fn test_dirty_word_inside_identifier_is_not_a_marker() {
        let d = RepoDescribe::parse("1.0.0-notdirty");
        assert!(!d.working_tree_dirty);
        assert_eq!(d.tag, "1.0.0-notdirty");
    }

    #[test]
    fn test_display_matches_git() {
        for raw in [
            "v1.0.2",
            "v1.0.2-dirty",
            "v1.0.2-3-g0123abcd",
            "1.0.0-rc.1-7-gdeadbeef-dirty",
        ] {
            assert_eq!(RepoDescribe::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_normalized_output_is_valid_semver() {
        for raw in [
            "v1.0.2-3-g0123abcd",
            "v1.0.2-3-g0123abcd-dirty",
            "v2.0.0-rc.1-4-gcafef00d",
            "v1.0.2-dirty",
        ] {
            let normalized = RepoDescribe::parse(raw).normalized();
            assert!(
                semver::Version::parse(&normalized).is_ok(),
                "'{}' should be valid semver",
                normalized
            );
        }
    }

    #[test]
    fn test_to_semver() {
        let v = RepoDescribe::parse("v1.0.2-3-g0123abcd-dirty")
            .to_semver()
            .unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 0, 2));
        assert_eq!(v.prerelease, vec!["3", "g0123abcd"]);
        assert!(v.dirty);
    }
}
