//! Glob matching for pipeline file selection.
//!
//! Patterns are matched against `/`-separated paths relative to a base
//! directory:
//!
//! | Pattern    | Matches                                    |
//! |------------|--------------------------------------------|
//! | `*`        | any run of characters except `/`           |
//! | `?`        | one character except `/`                   |
//! | `**`       | any number of path segments, including none |
//! | `!pattern` | excludes paths matched by `pattern`         |

use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use jwalk::WalkDir;
use thiserror::Error;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::to_slash;

/// Invalid glob pattern.
#[derive(Debug, Error)]
pub enum GlobError {
    #[error("empty glob pattern")]
    Empty,

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Compile one pattern with `*` and `?` confined to a path segment.
fn build(pattern: &str) -> Result<globset::Glob, GlobError> {
    if pattern.is_empty() {
        return Err(GlobError::Empty);
    }
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|source| GlobError::Invalid {
            pattern: pattern.to_string(),
            source,
        })
}

/// Include and exclude patterns evaluated together.
///
/// A path matches when at least one include matches and no exclude does.
#[derive(Debug, Clone)]
pub struct GlobSet {
    include: globset::GlobSet,
    exclude: globset::GlobSet,
}

impl GlobSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, GlobError> {
        let mut include = globset::GlobSetBuilder::new();
        let mut exclude = globset::GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            match pattern.strip_prefix('!') {
                Some(negated) => exclude.add(build(negated)?),
                None => include.add(build(pattern)?),
            };
        }
        let finish = |builder: globset::GlobSetBuilder| {
            builder.build().map_err(|source| GlobError::Invalid {
                pattern: patterns
                    .iter()
                    .map(|p| p.as_ref().trim())
                    .collect::<Vec<_>>()
                    .join(", "),
                source,
            })
        };
        Ok(Self {
            include: finish(include)?,
            exclude: finish(exclude)?,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }

    /// Files below `base` matching this set, as paths relative to `base`.
    ///
    /// Results are sorted so repeated runs process files in the same order.
    pub fn walk(&self, base: &Path) -> Vec<PathBuf> {
        if self.include.is_empty() {
            return Vec::new();
        }
        WalkDir::new(base)
            .sort(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(base).ok().map(Path::to_path_buf))
            .filter(|rel| self.matches(&to_slash(rel)))
            .collect()
    }
}

/// Report every invalid pattern of a config field.
pub fn validate_patterns(patterns: &[String], diag: &mut ConfigDiagnostics) {
    for pattern in patterns {
        if let Err(e) = build(pattern.trim().trim_start_matches('!')) {
            diag.error(FieldPath::new("clean.patterns"), e.to_string());
        }
    }
}

// ============================================================================
// tests
// ============================================================================
