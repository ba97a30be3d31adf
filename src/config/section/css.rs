//! `[css]` section configuration.
//!
//! Drives the `less`, `postcss`, `cssmin` and `copy:css` tasks.
//!
//! # Example
//!
//! ```toml
//! [css]
//! lessc = ["npx", "lessc"]
//! input = "hal.less"              # relative to [paths] less
//! output = "css/hal.css"          # relative to [paths] public
//! strict_math = true
//! editor_theme = "css/theme-logfile.css"
//!
//! [css.targets]                   # browsers prefixed for by `postcss`
//! ie = 9
//! chrome = 109
//! ```

use std::path::PathBuf;

use lightningcss::targets::{Browsers, Targets};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Banner prepended to the compiled stylesheet.
pub const CSS_BANNER: &str =
    "/*\n * Generated CSS file for HAL {version}\n * Build date: {date}\n */\n\n";

/// Minimum browser major versions used for vendor prefixing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserTargets {
    pub android: Option<u32>,
    pub chrome: Option<u32>,
    pub edge: Option<u32>,
    pub firefox: Option<u32>,
    pub ie: Option<u32>,
    pub ios_saf: Option<u32>,
    pub opera: Option<u32>,
    pub safari: Option<u32>,
    pub samsung: Option<u32>,
}

impl Default for BrowserTargets {
    /// Roughly "last 3 versions" at the time the console was built, plus IE 9.
    fn default() -> Self {
        Self {
            android: Some(4),
            chrome: Some(49),
            edge: Some(12),
            firefox: Some(45),
            ie: Some(9),
            ios_saf: Some(8),
            opera: Some(36),
            safari: Some(8),
            samsung: Some(4),
        }
    }
}

impl BrowserTargets {
    /// Convert to lightningcss targets (versions are encoded as `major << 16`).
    pub fn to_targets(&self) -> Targets {
        let encode = |v: Option<u32>| v.map(|major| major << 16);
        Targets::from(Browsers {
            android: encode(self.android),
            chrome: encode(self.chrome),
            edge: encode(self.edge),
            firefox: encode(self.firefox),
            ie: encode(self.ie),
            ios_saf: encode(self.ios_saf),
            opera: encode(self.opera),
            safari: encode(self.safari),
            samsung: encode(self.samsung),
        })
    }
}

/// CSS build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Command used to compile LESS (program followed by leading args).
    pub lessc: Vec<String>,

    /// Entry LESS file, relative to `[paths] less`.
    pub input: PathBuf,

    /// Compiled stylesheet, relative to `[paths] public`.
    pub output: PathBuf,

    /// Banner prepended to the compiled stylesheet.
    pub banner: Option<String>,

    /// Pass `--strict-math=on` to lessc.
    pub strict_math: bool,

    /// Browsers the `postcss` step adds vendor prefixes for.
    pub targets: BrowserTargets,

    /// Stylesheet written by the `editor` task, relative to `[paths] public`.
    pub editor_theme: PathBuf,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            lessc: vec!["lessc".into()],
            input: "hal.less".into(),
            output: "css/hal.css".into(),
            banner: Some(CSS_BANNER.into()),
            strict_math: true,
            targets: BrowserTargets::default(),
            editor_theme: "css/theme-logfile.css".into(),
        }
    }
}

impl CssConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.lessc.first().is_none_or(|program| program.trim().is_empty()) {
            diag.error_with_hint(
                FieldPath::new("css.lessc"),
                "command must not be empty",
                "install less and use `lessc = [\"lessc\"]`",
            );
        }
        if self.output.extension().is_none_or(|ext| ext != "css") {
            diag.error(
                FieldPath::new("css.output"),
                format!("expected a .css file, got `{}`", self.output.display()),
            );
        }
    }
}
