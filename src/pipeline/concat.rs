//! `concat:dev` and `concat:prod` tasks.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

use super::minify::minify_js;
use crate::config::{ConcatTarget, HalConfig};
use crate::log;

/// Bundle `target` into its destination under the public directory.
pub fn run(config: &HalConfig, target: &ConcatTarget, date: &str) -> Result<PathBuf> {
    let output = bundle(config, target, date)?;
    let dest = config.public_join(&target.dest);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, output).with_context(|| format!("Failed to write {}", dest.display()))?;

    log!("concat"; "{} sources -> {}", target.src.len(), config.root_relative(&dest).display());
    Ok(dest)
}

/// Concatenate the target's sources in declared order.
fn bundle(config: &HalConfig, target: &ConcatTarget, date: &str) -> Result<String> {
    let mut parts = Vec::with_capacity(target.src.len());
    for src in &target.src {
        let path = config.paths.bower.join(src);
        if !path.is_file() {
            log!("warning"; "concat source not found, skipping: {src}");
            continue;
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        parts.push(if target.strip_banners {
            strip_banner(&content).to_string()
        } else {
            content
        });
    }

    let mut body = parts.join("\n");
    if target.minify {
        match minify_js(&body) {
            Some(min) => body = min,
            None => log!("warning"; "failed to minify {}, writing it unminified", target.dest.display()),
        }
    }

    let banner = target
        .banner
        .as_deref()
        .map(|b| config.render_banner(b, date))
        .unwrap_or_default();
    Ok(banner + &body)
}

/// Drop a leading `/* ... */` block comment. `/*! ... */` comments are kept.
fn strip_banner(source: &str) -> &str {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*/\*[^!][\s\S]*?\*/\s*").unwrap());
    match re.find(source) {
        Some(m) => &source[m.end()..],
        None => source,
    }
}
