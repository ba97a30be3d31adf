//! `[theme]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [theme]
//! name = "hal"                                    # overridden by $HAL_THEME and --theme
//! assets = ["apple-touch-icon.png", "favicon.ico"] # copied from the theme dir to public/
//! ```

use serde::{Deserialize, Serialize};

/// Environment variable selecting the active theme.
pub const THEME_ENV: &str = "HAL_THEME";

/// Theme used when neither config, environment nor CLI name one.
pub const DEFAULT_THEME: &str = "hal";

/// Theme section configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Active theme name.
    pub name: String,

    /// Files copied from the theme resource directory into `public/`.
    pub assets: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME.into(),
            assets: vec!["apple-touch-icon.png".into(), "favicon.ico".into()],
        }
    }
}

impl ThemeConfig {
    /// Apply overrides: `--theme` wins over `$HAL_THEME`, which wins over the file.
    pub fn apply_overrides(&mut self, cli_theme: Option<&str>, env_theme: Option<&str>) {
        let chosen = cli_theme
            .or(env_theme)
            .map(str::trim)
            .filter(|name| !name.is_empty());
        if let Some(name) = chosen {
            self.name = name.to_string();
        }
    }
}
