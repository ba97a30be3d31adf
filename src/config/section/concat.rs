//! `[concat.dev]` / `[concat.prod]` section configuration.
//!
//! Sources are relative to `[paths] bower` and are concatenated in the
//! order listed:
//!
//! 1. jQuery
//! 2. Bootstrap + components
//! 3. C3 / D3
//! 4. DataTables
//! 5. other libraries (no specific order)
//! 6. PatternFly
//!
//! # Example
//!
//! ```toml
//! [concat.prod]
//! src = ["jquery/dist/jquery.min.js", "patternfly/dist/js/patternfly.min.js"]
//! dest = "js/external.min.js"
//! banner = "/*!\n * External JS files for HAL {version}\n * Build date: {date}\n */\n\n"
//! strip_banners = true
//! minify = false
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Libraries bundled into `external.js`, as (development, production) file pairs.
const EXTERNAL_LIBS: &[(&str, &str)] = &[
    ("jquery/dist/jquery.js", "jquery/dist/jquery.min.js"),
    ("bootstrap/dist/js/bootstrap.js", "bootstrap/dist/js/bootstrap.min.js"),
    (
        "bootstrap-select/dist/js/bootstrap-select.js",
        "bootstrap-select/dist/js/bootstrap-select.min.js",
    ),
    (
        "bootstrap-switch/dist/js/bootstrap-switch.js",
        "bootstrap-switch/dist/js/bootstrap-switch.min.js",
    ),
    ("c3/c3.js", "c3/c3.min.js"),
    ("d3/d3.js", "d3/d3.min.js"),
    (
        "datatables.net/js/jquery.dataTables.js",
        "datatables.net/js/jquery.dataTables.min.js",
    ),
    (
        "datatables.net-buttons/js/dataTables.buttons.js",
        "datatables.net-buttons/js/dataTables.buttons.min.js",
    ),
    (
        "datatables.net-keytable/js/dataTables.keyTable.js",
        "datatables.net-keytable/js/dataTables.keyTable.min.js",
    ),
    (
        "datatables.net-select/js/dataTables.select.js",
        "datatables.net-select/js/dataTables.select.min.js",
    ),
    (
        "ace-builds/src-noconflict/ace.js",
        "ace-builds/src-min-noconflict/ace.js",
    ),
    (
        "ace-builds/src-noconflict/ext-modelist.js",
        "ace-builds/src-min-noconflict/ext-modelist.js",
    ),
    (
        "google-code-prettify/src/prettify.js",
        "google-code-prettify/bin/prettify.min.js",
    ),
    (
        "javascript-auto-complete/auto-complete.js",
        "javascript-auto-complete/auto-complete.min.js",
    ),
    ("js-cookie/src/js.cookie.js", "js-cookie/src/js.cookie.js"),
    ("jstree/dist/jstree.js", "jstree/dist/jstree.min.js"),
    ("pouchdb/dist/pouchdb.js", "pouchdb/dist/pouchdb.min.js"),
    ("tagmanager/tagmanager.js", "tagmanager/tagmanager.js"),
    (
        "typeahead.js/dist/typeahead.bundle.js",
        "typeahead.js/dist/typeahead.bundle.min.js",
    ),
    (
        "zeroclipboard/dist/ZeroClipboard.js",
        "zeroclipboard/dist/ZeroClipboard.min.js",
    ),
    (
        "patternfly/dist/js/patternfly.js",
        "patternfly/dist/js/patternfly.min.js",
    ),
];

/// Banner prepended to the production bundle.
pub const PROD_BANNER: &str =
    "/*!\n * External JS files for HAL {version}\n * Build date: {date}\n */\n\n";

/// One concatenation target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatTarget {
    /// Source files relative to the bower directory, in output order.
    pub src: Vec<String>,

    /// Output file relative to the public directory.
    pub dest: PathBuf,

    /// Text written before the first source (`{version}` and `{date}` are filled in).
    pub banner: Option<String>,

    /// Drop leading `/* ... */` comments from each source (`/*!` comments are kept).
    pub strip_banners: bool,

    /// Minify the concatenated output with oxc.
    pub minify: bool,
}

impl Default for ConcatTarget {
    fn default() -> Self {
        Self {
            src: Vec::new(),
            dest: PathBuf::new(),
            banner: None,
            strip_banners: false,
            minify: false,
        }
    }
}

/// Both concatenation targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatConfig {
    pub dev: ConcatTarget,
    pub prod: ConcatTarget,
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            dev: ConcatTarget {
                src: EXTERNAL_LIBS.iter().map(|(dev, _)| (*dev).to_string()).collect(),
                dest: "js/external.js".into(),
                ..ConcatTarget::default()
            },
            prod: ConcatTarget {
                src: EXTERNAL_LIBS.iter().map(|(_, prod)| (*prod).to_string()).collect(),
                dest: "js/external.min.js".into(),
                banner: Some(PROD_BANNER.into()),
                strip_banners: true,
                minify: false,
            },
        }
    }
}

impl ConcatConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, target) in [
            (FieldPath::new("concat.dev"), &self.dev),
            (FieldPath::new("concat.prod"), &self.prod),
        ] {
            if target.dest.as_os_str().is_empty() {
                diag.error(field, "`dest` must not be empty");
            }
            if target.src.is_empty() {
                diag.warn(field, "no sources listed, output will only contain the banner");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_concat_defaults_keep_order() {
        let config = test_parse_config("");
        assert_eq!(config.concat.dev.src.first().unwrap(), "jquery/dist/jquery.js");
        assert_eq!(
            config.concat.dev.src.last().unwrap(),
            "patternfly/dist/js/patternfly.js"
        );
        assert_eq!(config.concat.dev.src.len(), config.concat.prod.src.len());
        assert!(config.concat.prod.strip_banners);
        assert!(config.concat.dev.banner.is_none());
    }

    #[test]
    fn test_concat_partial_override() {
        let config = test_parse_config("[concat.dev]\nsrc = [\"a.js\"]\ndest = \"js/a.js\"\nminify = true");
        assert_eq!(config.concat.dev.src, vec!["a.js"]);
        assert!(config.concat.dev.minify);
        // prod keeps defaults
        assert_eq!(config.concat.prod.dest, PathBuf::from("js/external.min.js"));
    }

    #[test]
    fn test_validate_empty_dest() {
        let mut concat = ConcatConfig::default();
        concat.dev.dest = PathBuf::new();
        let mut diag = ConfigDiagnostics::new();
        concat.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
