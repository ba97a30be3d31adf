//! `[clean]` section configuration.
//!
//! Patterns are relative to the public directory. A leading `!` keeps
//! matching files.
//!
//! # Example
//!
//! ```toml
//! [clean]
//! patterns = ["css/**", "js/*.js", "!js/mode-logfile.js"]
//! ```

use serde::{Deserialize, Serialize};

/// Files removed by the `clean` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub patterns: Vec<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "css/**".into(),
                "fonts/**".into(),
                "img/**".into(),
                "js/*.js".into(),
                "js/*.swf".into(),
                "!js/mode-logfile.js".into(),
                "!js/theme-logfile.js".into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_clean_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.clean.patterns.len(), 7);
        assert!(config.clean.patterns.contains(&"!js/mode-logfile.js".to_string()));
        assert!(config.clean.patterns.contains(&"!js/theme-logfile.js".to_string()));
    }

    #[test]
    fn test_clean_with_negation() {
        let config = test_parse_config("[clean]\npatterns = [\"js/*.js\", \"!js/mode-logfile.js\"]");
        assert_eq!(config.clean.patterns.len(), 2);
    }
}
