//! Command-line interface module.

mod args;
mod common;
pub mod highlight;
pub mod resolve;
pub mod run;
pub mod serve;
pub mod sync;
pub mod watch;

pub use args::{Cli, Commands};
