//! `[sync]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sync]
//! path = "~/.hal/sync"    # local document store directory
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Document store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Store directory; `~` is expanded.
    pub path: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            path: "~/.hal/sync".into(),
        }
    }
}

impl SyncConfig {
    /// Store directory with `~` expanded.
    pub fn store_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).into_owned())
    }
}
