//! `[paths]` section configuration.
//!
//! All paths are relative to the project root (the directory holding
//! `hal.toml`).
//!
//! # Example
//!
//! ```toml
//! [paths]
//! bower = "bower_components"
//! public = "src/main/resources/org/jboss/hal/public"
//! less = "src/less"
//! js = "src/js"
//! devmode_target = "target/gwt/devmode/war/hal"
//! themes = "../themes"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Source and destination directories used by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Vendored third-party packages.
    pub bower: PathBuf,

    /// Generated public resources (css, fonts, img, js).
    pub public: PathBuf,

    /// LESS sources.
    pub less: PathBuf,

    /// Project JavaScript shims copied verbatim.
    pub js: PathBuf,

    /// GWT devmode war directory that receives `hal.css` during `css`.
    pub devmode_target: PathBuf,

    /// Root of the theme checkouts (`<themes>/<name>/...`).
    pub themes: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bower: "bower_components".into(),
            public: "src/main/resources/org/jboss/hal/public".into(),
            less: "src/less".into(),
            js: "src/js".into(),
            devmode_target: "target/gwt/devmode/war/hal".into(),
            themes: "../themes".into(),
        }
    }
}

impl PathsConfig {
    /// Theme resource directory holding favicons and touch icons.
    pub fn theme_dir(&self, theme: &str) -> PathBuf {
        self.themes
            .join(theme)
            .join("src/main/resources/org/jboss/hal/theme")
            .join(theme)
    }

    /// Theme LESS directory added to the `lessc` include path.
    pub fn theme_less_dir(&self, theme: &str) -> PathBuf {
        self.themes.join(theme).join("src/main/less")
    }

    /// Resolve every relative path against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for path in [
            &mut self.bower,
            &mut self.public,
            &mut self.less,
            &mut self.js,
            &mut self.devmode_target,
            &mut self.themes,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.public.as_os_str().is_empty() {
            diag.error(FieldPath::new("paths.public"), "public directory must not be empty");
        }
        if self.public == self.bower {
            diag.error_with_hint(
                FieldPath::new("paths.public"),
                "public directory is the bower directory",
                "`clean` would delete vendored packages",
            );
        }
    }
}
