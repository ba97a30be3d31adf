//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from the server pool and the watch
//! loop.

use crate::config::HalConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<HalConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(HalConfig::default()));

#[inline]
pub fn cfg() -> Arc<HalConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: HalConfig) -> Arc<HalConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
