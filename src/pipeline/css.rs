//! Stylesheet tasks: `less`, `postcss`, `cssmin` and `editor`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

use super::minify::{minify_css, prefix_css};
use crate::config::HalConfig;
use crate::theme::EditorTheme;
use crate::utils::exec::{Cmd, LESSC_FILTER};
use crate::{debug, log};

/// Compile the LESS entry point with `lessc` and write banner + CSS.
pub fn less(config: &HalConfig, date: &str) -> Result<PathBuf> {
    let css = &config.css;
    let Some(program) = css.lessc.first() else {
        bail!("`[css] lessc` is empty");
    };
    if which::which(program).is_err() {
        bail!("`{program}` not found in PATH, install it with `npm install -g less`");
    }

    let include_paths = std::env::join_paths([&config.paths.less, &config.theme_less_dir()])
        .context("Invalid LESS include path")?;
    let mut include_arg = OsString::from("--include-path=");
    include_arg.push(&include_paths);
    debug!("less"; "include paths: {}", include_paths.to_string_lossy());

    let input = config.paths.less.join(&css.input);
    let output = Cmd::from_slice(&css.lessc)
        .arg(include_arg)
        .args(css.strict_math.then_some("--strict-math=on"))
        .arg(&input)
        .cwd(&config.root)
        .filter(&LESSC_FILTER)
        .run()
        .with_context(|| format!("Failed to compile {}", config.root_relative(&input).display()))?;

    let compiled = String::from_utf8(output.stdout).context("lessc produced invalid UTF-8")?;
    let banner = css
        .banner
        .as_deref()
        .map(|b| config.render_banner(b, date))
        .unwrap_or_default();

    let dest = config.public_join(&css.output);
    write(&dest, &(banner + &compiled))?;
    log!("less"; "{} -> {}", config.root_relative(&input).display(), config.root_relative(&dest).display());
    Ok(dest)
}

/// Add vendor prefixes to the compiled stylesheet in place.
pub fn postcss(config: &HalConfig) -> Result<PathBuf> {
    let dest = config.public_join(&config.css.output);
    let source =
        fs::read_to_string(&dest).with_context(|| format!("Failed to read {}", dest.display()))?;

    let (banner, body) = split_banner(&source);
    let prefixed = prefix_css(body, config.css.targets.to_targets())
        .with_context(|| format!("Failed to process {}", dest.display()))?;

    write(&dest, &format!("{banner}{prefixed}"))?;
    log!("postcss"; "{}", config.root_relative(&dest).display());
    Ok(dest)
}

/// Minify every `*.css` next to the compiled stylesheet into `*.min.css`.
pub fn cssmin(config: &HalConfig) -> Result<Vec<PathBuf>> {
    let output = config.public_join(&config.css.output);
    let Some(css_dir) = output.parent() else {
        return Ok(Vec::new());
    };
    if !css_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut sources: Vec<PathBuf> = fs::read_dir(css_dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_unminified_css(p))
        .collect();
    sources.sort();

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let content = fs::read_to_string(&source)?;
        let minified = minify_css(&content)
            .with_context(|| format!("Failed to minify {}", source.display()))?;
        let target = source.with_extension("min.css");
        write(&target, &minified)?;
        log!("cssmin"; "{}", config.root_relative(&target).display());
        written.push(target);
    }
    Ok(written)
}

/// Write the log-file editor theme stylesheet.
pub fn editor(config: &HalConfig) -> Result<PathBuf> {
    let dest = config.public_join(&config.css.editor_theme);
    write(&dest, &EditorTheme::logfile().to_css())?;
    log!("editor"; "{}", config.root_relative(&dest).display());
    Ok(dest)
}

fn is_unminified_css(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    name.ends_with(".css") && !name.ends_with(".min.css")
}

/// Split leading block comments from a stylesheet.
fn split_banner(source: &str) -> (&str, &str) {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(?:\s*/\*[\s\S]*?\*/)+\s*").unwrap());
    let end = re.find(source).map_or(0, |m| m.end());
    source.split_at(end)
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
