//! Project configuration management for `hal.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! ├── types/         # ConfigError, FieldPath, global handle
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # HalConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section              | Purpose                                        |
//! |----------------------|------------------------------------------------|
//! | `version`            | Console version used in banners                |
//! | `[paths]`            | bower, public, less, js, devmode, themes dirs  |
//! | `[theme]`            | Active theme and theme assets                  |
//! | `[clean]`            | Patterns removed by `clean`                    |
//! | `[[copy.resources]]` | Vendored assets copied into public             |
//! | `[concat.*]`         | `external.js` / `external.min.js` bundles      |
//! | `[css]`              | lessc, prefix targets, output files            |
//! | `[serve]`            | Static server (interface, port, dir)           |
//! | `[sync]`             | Local document store location                  |
//!
//! Every section is optional; the defaults reproduce the console's
//! historical build layout.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    CleanConfig, ConcatConfig, ConcatTarget, CopyConfig, CssConfig, PathsConfig, ServeConfig,
    SyncConfig, ThemeConfig,
};

pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hal.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HalConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Console version, substituted into banners.
    pub version: String,

    pub paths: PathsConfig,
    pub theme: ThemeConfig,
    pub clean: CleanConfig,
    pub copy: CopyConfig,
    pub concat: ConcatConfig,
    pub css: CssConfig,
    pub serve: ServeConfig,
    pub sync: SyncConfig,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            version: env!("CARGO_PKG_VERSION").into(),
            paths: PathsConfig::default(),
            theme: ThemeConfig::default(),
            clean: CleanConfig::default(),
            copy: CopyConfig::default(),
            concat: ConcatConfig::default(),
            css: CssConfig::default(),
            serve: ServeConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl HalConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing file is not
    /// an error: defaults are used with cwd as the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        let env_theme = std::env::var(section::THEME_ENV).ok();
        config
            .theme
            .apply_overrides(cli.theme.as_deref(), env_theme.as_deref());

        config.finalize();
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Resolve relative paths against the project root.
    fn finalize(&mut self) {
        let root = self.root.clone();
        self.paths.normalize(&root);
        if let Some(dir) = self.serve.dir.take() {
            self.serve.dir = Some(self.root_join(dir));
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface,
            port,
            dir,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            if port.is_some() {
                self.serve.port = *port;
            }
            if let Some(dir) = dir {
                self.serve.dir = Some(crate::utils::path::normalize_path(dir));
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.version.trim().is_empty() {
            diag.error(FieldPath::new("version"), "version must not be empty");
        }
        self.paths.validate(&mut diag);
        self.copy.validate(&mut diag);
        self.concat.validate(&mut diag);
        self.css.validate(&mut diag);
        crate::pipeline::glob::validate_patterns(&self.clean.patterns, &mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    #[cfg(test)]
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Join a path with the public directory.
    pub fn public_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.paths.public.join(path)
    }

    /// Resource directory of the active theme.
    pub fn theme_dir(&self) -> PathBuf {
        self.paths.theme_dir(&self.theme.name)
    }

    /// LESS directory of the active theme.
    pub fn theme_less_dir(&self) -> PathBuf {
        self.paths.theme_less_dir(&self.theme.name)
    }

    /// Directory mounted by `serve`.
    pub fn serve_dir(&self) -> PathBuf {
        self.serve
            .dir
            .clone()
            .unwrap_or_else(|| self.paths.public.clone())
    }

    /// Fill `{version}` and `{date}` into a banner template.
    pub fn render_banner(&self, template: &str, date: &str) -> String {
        template
            .replace("{version}", &self.version)
            .replace("{date}", date)
    }
}

/// Parse a config snippet for tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> HalConfig {
    let (parsed, ignored) = HalConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Build a config rooted at `root` with all paths resolved, for tests.
#[cfg(test)]
pub fn test_config_at(root: &Path, extra: &str) -> HalConfig {
    let mut config = test_parse_config(extra);
    config.set_root(root);
    config.finalize();
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<HalConfig, _> = toml::from_str("[paths\nbower = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_default() {
        let config = HalConfig::default();

        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.theme.name, "hal");
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert!(config.serve.port.is_none());
    }

    #[test]
    fn test_set_root() {
        let mut config = HalConfig::default();
        config.set_root(Path::new("/custom/path"));
        assert_eq!(config.get_root(), Path::new("/custom/path"));
        assert_eq!(
            config.root_relative("/custom/path/src/less"),
            PathBuf::from("src/less")
        );
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "version = \"1.0\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = HalConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.version, "1.0");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_finalize_resolves_paths() {
        let config = test_config_at(Path::new("/work/hal"), "[serve]\ndir = \"dist\"");
        assert_eq!(config.paths.bower, PathBuf::from("/work/hal/bower_components"));
        assert_eq!(config.serve_dir(), PathBuf::from("/work/hal/dist"));
        assert_eq!(
            config.theme_dir(),
            PathBuf::from("/work/hal/../themes/hal/src/main/resources/org/jboss/hal/theme/hal")
        );
    }

    #[test]
    fn test_serve_dir_defaults_to_public() {
        let config = test_config_at(Path::new("/work/hal"), "");
        assert_eq!(config.serve_dir(), config.paths.public);
    }

    #[test]
    fn test_render_banner() {
        let config = test_parse_config("version = \"0.9.4\"");
        let banner = config.render_banner(section_banner(), "2024-01-01 10:00:00");
        assert!(banner.contains("HAL 0.9.4"));
        assert!(banner.contains("Build date: 2024-01-01 10:00:00"));
    }

    fn section_banner() -> &'static str {
        "/*!\n * External JS files for HAL {version}\n * Build date: {date}\n */\n\n"
    }

    #[test]
    fn test_validate_defaults_ok() {
        let config = test_config_at(Path::new("/work/hal"), "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = test_config_at(Path::new("/work/hal"), "version = \"\"\n[css]\nlessc = []");
        let err = config.validate().unwrap_err();
        let err = err.downcast::<ConfigError>().unwrap();
        match err {
            ConfigError::Diagnostics(diag) => assert_eq!(diag.errors().len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
