//! `copy:resources` and `copy:css` tasks.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::glob::GlobSet;
use crate::config::HalConfig;
use crate::log;

/// Copy every `[[copy.resources]]` group plus the active theme's assets.
///
/// Returns the total number of files copied.
pub fn resources(config: &HalConfig) -> Result<usize> {
    let public = &config.paths.public;
    let mut total = 0;

    for group in &config.copy.resources {
        let src_dir = group.source_dir(&config.paths, &config.root);
        let dest_dir = public.join(&group.dest);
        total += copy_group(config, &src_dir, &group.src, &dest_dir)?;
    }

    total += copy_group(config, &config.theme_dir(), &config.theme.assets, public)?;
    Ok(total)
}

/// Copy the compiled stylesheet into the GWT devmode war.
pub fn css(config: &HalConfig) -> Result<PathBuf> {
    let source = config.public_join(&config.css.output);
    let file_name = source
        .file_name()
        .with_context(|| format!("Invalid css output: {}", source.display()))?;
    let target = config.paths.devmode_target.join("css").join(file_name);

    copy_file(&source, &target)?;
    log!("copy"; "{} -> {}", config.root_relative(&source).display(), config.root_relative(&target).display());
    Ok(target)
}

/// Expand `patterns` under `src_dir` and copy the matches into `dest_dir`,
/// keeping their paths relative to `src_dir`.
fn copy_group(
    config: &HalConfig,
    src_dir: &Path,
    patterns: &[String],
    dest_dir: &Path,
) -> Result<usize> {
    if !src_dir.is_dir() {
        log!("warning"; "copy source not found, skipping: {}", config.root_relative(src_dir).display());
        return Ok(0);
    }

    let files = GlobSet::new(patterns)?.walk(src_dir);
    files
        .par_iter()
        .try_for_each(|rel| copy_file(&src_dir.join(rel), &dest_dir.join(rel)))?;

    if !files.is_empty() {
        log!(
            "copy";
            "{} files {} -> {}",
            files.len(),
            config.root_relative(src_dir).display(),
            config.root_relative(dest_dir).display()
        );
    }
    Ok(files.len())
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)
        .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const LAYOUT: &str = r#"
[paths]
bower = "bower"
public = "public"
js = "js"
devmode_target = "devmode"
themes = "themes"

[theme]
assets = ["favicon.ico"]

[[copy.resources]]
cwd = "jstree/dist/themes/default"
src = ["*.png", "**/*.gif"]
dest = "img"

[[copy.resources]]
from = "js"
src = ["*.js"]
dest = "js"
"#;

    #[test]
    fn test_resources_preserve_relative_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let themes = "jstree/dist/themes/default";
        touch(&root.join("bower").join(themes).join("32px.png"), "png");
        touch(&root.join("bower").join(themes).join("sub/throbber.gif"), "gif");
        touch(&root.join("bower").join(themes).join("style.css"), "css");
        touch(&root.join("js/mode-logfile.js"), "mode");
        touch(
            &root.join("themes/hal/src/main/resources/org/jboss/hal/theme/hal/favicon.ico"),
            "ico",
        );

        let config = test_config_at(root, LAYOUT);
        let copied = resources(&config).unwrap();

        assert_eq!(copied, 4);
        assert!(root.join("public/img/32px.png").exists());
        assert!(root.join("public/img/sub/throbber.gif").exists());
        assert!(!root.join("public/img/style.css").exists());
        assert_eq!(fs::read_to_string(root.join("public/js/mode-logfile.js")).unwrap(), "mode");
        assert!(root.join("public/favicon.ico").exists());
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), LAYOUT);
        assert_eq!(resources(&config).unwrap(), 0);
    }

    #[test]
    fn test_copy_css_to_devmode() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("public/css/hal.css"), ".a{}");

        let config = test_config_at(root, LAYOUT);
        let target = css(&config).unwrap();

        assert_eq!(target, root.join("devmode/css/hal.css"));
        assert_eq!(fs::read_to_string(target).unwrap(), ".a{}");
    }

    #[test]
    fn test_copy_css_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), LAYOUT);
        assert!(css(&config).is_err());
    }
}
