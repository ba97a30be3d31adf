//! `[[copy.resources]]` section configuration.
//!
//! Each group expands its `src` globs below `cwd` and copies the matches
//! into `dest` (relative to the public directory), keeping the path
//! relative to `cwd`.
//!
//! # Example
//!
//! ```toml
//! [[copy.resources]]
//! from = "bower"                        # bower | js | root
//! cwd = "jstree/dist/themes/default"
//! src = ["*.gif", "*.png"]
//! dest = "img"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::section::PathsConfig;
use crate::config::{ConfigDiagnostics, FieldPath};

/// Directory a copy group's `cwd` is relative to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyBase {
    /// `[paths] bower`
    #[default]
    Bower,
    /// `[paths] js`
    Js,
    /// The project root.
    Root,
}

/// One source directory + glob list + destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyGroup {
    #[serde(default)]
    pub from: CopyBase,
    #[serde(default)]
    pub cwd: PathBuf,
    pub src: Vec<String>,
    #[serde(default)]
    pub dest: PathBuf,
}

impl CopyGroup {
    fn bower(cwd: &str, src: &[&str], dest: &str) -> Self {
        Self {
            from: CopyBase::Bower,
            cwd: cwd.into(),
            src: src.iter().map(|s| (*s).to_string()).collect(),
            dest: dest.into(),
        }
    }

    /// Absolute source directory for this group.
    pub fn source_dir(&self, paths: &PathsConfig, root: &Path) -> PathBuf {
        let base = match self.from {
            CopyBase::Bower => &paths.bower,
            CopyBase::Js => &paths.js,
            CopyBase::Root => root,
        };
        base.join(&self.cwd)
    }
}

/// Copy tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Groups copied by `copy:resources`.
    pub resources: Vec<CopyGroup>,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            resources: vec![
                CopyGroup::bower(
                    "ace-builds/src-min-noconflict",
                    &["mode-*.js", "theme-*.js", "worker-*.js"],
                    "js",
                ),
                CopyGroup::bower("patternfly/dist/fonts", &["*"], "fonts"),
                CopyGroup::bower("jstree/dist/themes/default", &["*.gif", "*.png"], "img"),
                CopyGroup::bower("zeroclipboard/dist", &["ZeroClipboard.swf"], "js"),
                CopyGroup::bower("pouchdb/dist", &["pouchdb.js", "pouchdb.min.js"], "js"),
                CopyGroup {
                    from: CopyBase::Js,
                    cwd: PathBuf::new(),
                    src: vec!["*.js".into()],
                    dest: "js".into(),
                },
            ],
        }
    }
}

impl CopyConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (idx, group) in self.resources.iter().enumerate() {
            if group.src.is_empty() {
                diag.error(
                    FieldPath::new("copy.resources"),
                    format!("[{idx}] `src` must list at least one pattern"),
                );
            }
            if group.dest.is_absolute() || group.dest.components().any(|c| c.as_os_str() == "..") {
                diag.error(
                    FieldPath::new("copy.resources"),
                    format!(
                        "[{idx}] `dest` must stay inside the public directory: {}",
                        group.dest.display()
                    ),
                );
            }
        }
    }
}
