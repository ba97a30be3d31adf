//! `clean` task: remove generated files from the public directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::glob::GlobSet;
use crate::config::HalConfig;
use crate::debug;

/// Delete every file under the public directory matched by `[clean] patterns`,
/// then prune directories left empty. Returns the number of files removed.
pub fn run(config: &HalConfig) -> Result<usize> {
    let public = &config.paths.public;
    let set = GlobSet::new(&config.clean.patterns)?;
    clean_dir(public, &set)
}

fn clean_dir(base: &Path, set: &GlobSet) -> Result<usize> {
    if !base.exists() {
        return Ok(0);
    }

    let files = set.walk(base);
    let mut parents: Vec<PathBuf> = Vec::new();

    for rel in &files {
        let path = base.join(rel);
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        debug!("clean"; "{}", rel.display());

        let mut dir = rel.parent();
        while let Some(d) = dir.filter(|d| !d.as_os_str().is_empty()) {
            parents.push(d.to_path_buf());
            dir = d.parent();
        }
    }

    // Deepest first so a parent is only tried after its children.
    parents.sort_by(|a, b| {
        b.components()
            .count()
            .cmp(&a.components().count())
            .then_with(|| a.cmp(b))
    });
    parents.dedup();
    for dir in parents {
        // Still holds kept files: leave it.
        let _ = fs::remove_dir(base.join(dir));
    }

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(base: &Path, rel: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_clean_removes_matches_and_empty_dirs() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        touch(base, "css/hal.css");
        touch(base, "fonts/sub/OpenSans.woff");
        touch(base, "index.html");

        let set = GlobSet::new(&["css/**", "fonts/**"]).unwrap();
        let removed = clean_dir(base, &set).unwrap();

        assert_eq!(removed, 2);
        assert!(!base.join("css").exists());
        assert!(!base.join("fonts").exists());
        assert!(base.join("index.html").exists());
    }

    #[test]
    fn test_clean_keeps_negated_files() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        touch(base, "js/external.js");
        touch(base, "js/mode-logfile.js");
        touch(base, "js/theme-logfile.js");

        let set = GlobSet::new(&["js/**", "!js/mode-logfile.js", "!js/theme-logfile.js"]).unwrap();
        let removed = clean_dir(base, &set).unwrap();

        assert_eq!(removed, 1);
        assert!(!base.join("js/external.js").exists());
        assert!(base.join("js/mode-logfile.js").exists());
        assert!(base.join("js/theme-logfile.js").exists());
    }

    #[test]
    fn test_clean_missing_public_dir() {
        let dir = TempDir::new().unwrap();
        let set = GlobSet::new(&["css/**"]).unwrap();
        assert_eq!(clean_dir(&dir.path().join("missing"), &set).unwrap(), 0);
    }
}
