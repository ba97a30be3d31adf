//! Configuration section definitions for `hal.toml`.

mod clean;
mod concat;
mod copy;
mod css;
mod paths;
mod serve;
mod sync;
mod theme;

pub use clean::CleanConfig;
pub use concat::{ConcatConfig, ConcatTarget};
pub use copy::CopyConfig;
pub use css::CssConfig;
pub use paths::PathsConfig;
pub use serve::ServeConfig;
pub use sync::SyncConfig;
pub use theme::{THEME_ENV, ThemeConfig};
