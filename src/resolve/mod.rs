//! `theme:` module specifier resolution.
//!
//! Bundled sources import theme-specific files through a `theme:` prefix.
//! The remainder is looked up in the active theme:
//!
//! ```text
//! theme:/css/logo.css            -> <themes>/<theme>/css/logo.css
//! theme:./local.css  from <root>/a/b/importer.js
//!                                -> <themes>/<theme>/a/b/local.css
//! ```
//!
//! Any other specifier is declined so the bundler resolves it itself.
//! Resolution is purely lexical: results are neither cached nor checked
//! for existence.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::utils::path::clean_path;

/// Specifier prefix handled by the resolver.
pub const PREFIX: &str = "theme:";

/// Outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Absolute path inside the active theme.
    Resolved(PathBuf),
    /// Not a `theme:` specifier.
    Declined,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("importer `{importer}` is outside the project root `{root}`")]
    ImporterOutsideRoot { importer: PathBuf, root: PathBuf },

    #[error("`{specifier}` escapes the theme directory")]
    EscapesTheme { specifier: String },
}

#[derive(Debug, Clone)]
pub struct ThemeResolver {
    root: PathBuf,
    themes_root: PathBuf,
    theme: String,
}

impl ThemeResolver {
    pub fn new(root: impl Into<PathBuf>, themes_root: impl Into<PathBuf>, theme: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            themes_root: themes_root.into(),
            theme: theme.into(),
        }
    }

    /// Directory of the active theme.
    pub fn theme_dir(&self) -> PathBuf {
        self.themes_root.join(&self.theme)
    }

    /// Resolve `specifier` imported from the file `importer`.
    pub fn resolve(&self, specifier: &str, importer: &Path) -> Result<Resolution, ResolveError> {
        let Some(rest) = specifier.strip_prefix(PREFIX) else {
            return Ok(Resolution::Declined);
        };

        let relative = match rest.strip_prefix('/') {
            Some(in_theme) => PathBuf::from(in_theme),
            None => {
                let outside = || ResolveError::ImporterOutsideRoot {
                    importer: importer.to_path_buf(),
                    root: self.root.clone(),
                };
                let importer_dir = importer
                    .parent()
                    .and_then(clean_path)
                    .ok_or_else(outside)?;
                let dir = importer_dir.strip_prefix(&self.root).map_err(|_| outside())?;
                dir.join(rest)
            }
        };

        let cleaned = clean_path(&relative)
            .filter(|p| !p.has_root())
            .ok_or_else(|| ResolveError::EscapesTheme {
                specifier: specifier.to_string(),
            })?;

        Ok(Resolution::Resolved(self.theme_dir().join(cleaned)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ThemeResolver {
        ThemeResolver::new("/work/hal", "/work/themes", "X")
    }

    fn resolved(path: &str) -> Result<Resolution, ResolveError> {
        Ok(Resolution::Resolved(PathBuf::from(path)))
    }

    #[test]
    fn test_absolute_in_theme() {
        let r = resolver();
        assert_eq!(
            r.resolve("theme:/foo/bar.css", Path::new("/work/hal/app/main.js")),
            resolved("/work/themes/X/foo/bar.css")
        );
    }

    #[test]
    fn test_relative_to_importer_dir() {
        let r = resolver();
        assert_eq!(
            r.resolve("theme:./local.css", Path::new("/work/hal/a/b/importer.js")),
            resolved("/work/themes/X/a/b/local.css")
        );
    }

    #[test]
    fn test_relative_parent_segments() {
        let r = resolver();
        assert_eq!(
            r.resolve("theme:../c/./x.css", Path::new("/work/hal/a/b/importer.js")),
            resolved("/work/themes/X/a/c/x.css")
        );
    }

    #[test]
    fn test_non_theme_specifier_declined() {
        let r = resolver();
        let importer = Path::new("/work/hal/a/importer.js");
        assert_eq!(r.resolve("./local.css", importer), Ok(Resolution::Declined));
        assert_eq!(r.resolve("jquery", importer), Ok(Resolution::Declined));
        assert_eq!(r.resolve("themes:/x", importer), Ok(Resolution::Declined));
    }

    #[test]
    fn test_importer_outside_root() {
        let r = resolver();
        let err = r
            .resolve("theme:./x.css", Path::new("/elsewhere/importer.js"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::ImporterOutsideRoot { .. }));
    }

    #[test]
    fn test_importer_cleaned_before_root_check() {
        let r = resolver();
        let err = r
            .resolve("theme:./y.css", Path::new("/work/hal/a/../../x/i.js"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::ImporterOutsideRoot { .. }));

        assert_eq!(
            r.resolve("theme:./y.css", Path::new("/work/hal/a/../b/./i.js")),
            resolved("/work/themes/X/b/y.css")
        );
    }

    #[test]
    fn test_escape_rejected() {
        let r = resolver();
        let importer = Path::new("/work/hal/a/importer.js");
        assert_eq!(
            r.resolve("theme:../../../etc/passwd", importer),
            Err(ResolveError::EscapesTheme {
                specifier: "theme:../../../etc/passwd".into()
            })
        );
        assert!(r.resolve("theme:/../x.css", importer).is_err());
    }

    #[test]
    fn test_theme_dir() {
        assert_eq!(resolver().theme_dir(), PathBuf::from("/work/themes/X"));
    }
}
