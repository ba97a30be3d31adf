//! `resolve` command.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::HalConfig;
use crate::log;
use crate::resolve::{PREFIX, Resolution, ThemeResolver};

/// Print the path a `theme:` specifier resolves to for the active theme.
pub fn resolve_specifier(config: &HalConfig, specifier: &str, from: &Path) -> Result<()> {
    let importer = std::path::absolute(from)
        .with_context(|| format!("Failed to make {} absolute", from.display()))?;
    let resolver = ThemeResolver::new(config.get_root(), &config.paths.themes, &config.theme.name);

    match resolver.resolve(specifier, &importer)? {
        Resolution::Resolved(path) => println!("{}", path.display()),
        Resolution::Declined => {
            log!("resolve"; "`{specifier}` has no `{PREFIX}` prefix, left to the bundler");
        }
    }
    Ok(())
}
