//! Plugin file mapping extracted from a generation reply.
//!
//! Paths supplied by the model are untrusted: every path must stay inside the
//! plugin directory, and the reply as a whole is bounded in file count and
//! per-file size.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::fenced::{FencedBlocks, scan_file_blocks};

/// Default cap on distinct files accepted from one reply.
pub const DEFAULT_MAX_FILES: usize = 64;
/// Default cap on bytes accepted for one file.
pub const DEFAULT_MAX_FILE_BYTES: usize = 512 * 1024;

/// Validation errors for [`RelativeFilePath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelativePathError {
    /// The path was blank.
    #[error("file path must not be empty")]
    Empty,
    /// The path was absolute or carried a drive prefix.
    #[error("file path must be relative: {path}")]
    Absolute {
        /// Offending path.
        path: String,
    },
    /// The path climbed out of the plugin directory.
    #[error("file path must not contain '..' segments: {path}")]
    ParentSegment {
        /// Offending path.
        path: String,
    },
    /// The path contained a backslash or a control character.
    #[error("file path contains forbidden characters: {path}")]
    ForbiddenCharacter {
        /// Offending path.
        path: String,
    },
}

/// Relative path of a generated file inside its plugin directory.
///
/// # Examples
/// ```
/// use devassist::domain::RelativeFilePath;
///
/// assert!(RelativeFilePath::new("includes/class-demo.php").is_ok());
/// assert!(RelativeFilePath::new("../wp-config.php").is_err());
/// assert!(RelativeFilePath::new("/etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativeFilePath(String);

impl RelativeFilePath {
    /// Validate a model-supplied path.
    pub fn new(raw: impl Into<String>) -> Result<Self, RelativePathError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RelativePathError::Empty);
        }
        if trimmed.chars().any(|c| c == '\\' || c.is_control()) {
            return Err(RelativePathError::ForbiddenCharacter { path: raw });
        }
        let mut normalised = Vec::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(segment) => normalised.push(segment.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => return Err(RelativePathError::ParentSegment { path: raw }),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(RelativePathError::Absolute { path: raw });
                }
            }
        }
        if normalised.is_empty() {
            return Err(RelativePathError::Empty);
        }
        Ok(Self(normalised.join("/")))
    }

    /// Borrow the normalised path text using `/` separators.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Convert to a relative filesystem path.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl fmt::Display for RelativeFilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounds applied while folding a reply into [`PluginFiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum number of distinct files.
    pub max_files: usize,
    /// Maximum bytes per file.
    pub max_file_bytes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Errors raised while folding file blocks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PluginFilesError {
    /// A block named an unsafe path.
    #[error(transparent)]
    UnsafePath(#[from] RelativePathError),
    /// More distinct files than allowed.
    #[error("reply contains more than {limit} files")]
    TooManyFiles {
        /// Configured maximum.
        limit: usize,
    },
    /// One file exceeded the byte limit.
    #[error("file {path} exceeds {limit} bytes")]
    FileTooLarge {
        /// Offending path.
        path: String,
        /// Configured maximum.
        limit: usize,
    },
}

/// Ordered path to content mapping for one generated plugin.
pub type PluginFiles = FencedBlocks<RelativeFilePath, String>;

/// Fold the file blocks of `reply` into a bounded, validated mapping.
///
/// A reply without blocks yields an empty mapping; the caller decides whether
/// that is a failure. A file label sits on one line, so a match whose label
/// spans lines (two ordinary code fences paired up) is not a file and is
/// skipped.
pub fn parse_plugin_files(reply: &str, limits: ParseLimits) -> Result<PluginFiles, PluginFilesError> {
    let mut files = PluginFiles::default();
    for block in scan_file_blocks(reply) {
        if block.path.contains(['\n', '\r']) {
            debug!(label = %block.path.escape_debug(), "skipping multi-line fence label");
            continue;
        }
        let path = RelativeFilePath::new(block.path)?;
        if block.content.len() > limits.max_file_bytes {
            return Err(PluginFilesError::FileTooLarge {
                path: path.to_string(),
                limit: limits.max_file_bytes,
            });
        }
        files.insert(path, block.content.to_owned());
        if files.len() > limits.max_files {
            return Err(PluginFilesError::TooManyFiles {
                limit: limits.max_files,
            });
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("demo.php", "demo.php")]
    #[case("./includes/a.php", "includes/a.php")]
    #[case("assets//js/app.js", "assets/js/app.js")]
    fn normalises_relative_paths(#[case] raw: &str, #[case] expected: &str) {
        let path = RelativeFilePath::new(raw).expect("valid path");
        assert_eq!(path.as_str(), expected);
    }

    #[rstest]
    #[case("", RelativePathError::Empty)]
    #[case(".", RelativePathError::Empty)]
    #[case("../x.php", RelativePathError::ParentSegment { path: "../x.php".to_owned() })]
    #[case("a/../../x.php", RelativePathError::ParentSegment { path: "a/../../x.php".to_owned() })]
    #[case("/etc/passwd", RelativePathError::Absolute { path: "/etc/passwd".to_owned() })]
    #[case("a\\b.php", RelativePathError::ForbiddenCharacter { path: "a\\b.php".to_owned() })]
    #[case("bash\nwp plugin list", RelativePathError::ForbiddenCharacter { path: "bash\nwp plugin list".to_owned() })]
    #[case("tab\there.php", RelativePathError::ForbiddenCharacter { path: "tab\there.php".to_owned() })]
    fn rejects_unsafe_paths(#[case] raw: &str, #[case] expected: RelativePathError) {
        assert_eq!(RelativeFilePath::new(raw), Err(expected));
    }

    #[rstest]
    fn returns_exactly_k_distinct_files() {
        let reply = "```demo.php```\n<?php // main\n```\n```includes/a.php```\n<?php // a\n```\n```readme.txt```\nHello\n```";
        let files = parse_plugin_files(reply, ParseLimits::default()).expect("parse");
        assert_eq!(files.len(), 3);
        let keys: Vec<&str> = files.keys().map(RelativeFilePath::as_str).collect();
        assert_eq!(keys, vec!["demo.php", "includes/a.php", "readme.txt"]);
    }

    #[rstest]
    fn duplicates_keep_last_content_and_first_position() {
        let reply = "```a.php```\nold\n```\n```b.php```\nb\n```\n```./a.php```\nnew\n```";
        let files = parse_plugin_files(reply, ParseLimits::default()).expect("parse");
        assert_eq!(files.len(), 2);
        let a = RelativeFilePath::new("a.php").expect("valid path");
        assert_eq!(files.get(&a).map(String::as_str), Some("new\n"));
        assert_eq!(files.keys().next(), Some(&a));
    }

    #[rstest]
    fn empty_reply_yields_empty_mapping() {
        let files = parse_plugin_files("I cannot help with that.", ParseLimits::default())
            .expect("parse");
        assert!(files.is_empty());
    }

    #[rstest]
    fn rejects_traversal_in_any_block() {
        let reply = "```ok.php```\nfine\n```\n```../../wp-config.php```\nevil\n```";
        let error = parse_plugin_files(reply, ParseLimits::default()).expect_err("unsafe");
        assert!(matches!(error, PluginFilesError::UnsafePath(RelativePathError::ParentSegment { .. })));
    }

    #[rstest]
    fn paired_usage_fences_are_not_files() {
        let reply = "```demo.php```\n<?php\n```\n\nUsage:\n```bash\nwp plugin activate demo\n```\nor\n```bash\nwp plugin list\n```";
        let files = parse_plugin_files(reply, ParseLimits::default()).expect("parses");
        let keys: Vec<&str> = files.keys().map(RelativeFilePath::as_str).collect();
        assert_eq!(keys, ["demo.php"]);
    }

    #[rstest]
    fn enforces_file_count_limit() {
        let reply = "```a```\n1\n```\n```b```\n2\n```\n```c```\n3\n```";
        let limits = ParseLimits {
            max_files: 2,
            max_file_bytes: 100,
        };
        let error = parse_plugin_files(reply, limits).expect_err("too many");
        assert_eq!(error, PluginFilesError::TooManyFiles { limit: 2 });
    }

    #[rstest]
    fn enforces_file_size_limit() {
        let reply = "```big.php```\n0123456789\n```";
        let limits = ParseLimits {
            max_files: 2,
            max_file_bytes: 4,
        };
        let error = parse_plugin_files(reply, limits).expect_err("too large");
        assert!(matches!(error, PluginFilesError::FileTooLarge { limit: 4, .. }));
    }
}
