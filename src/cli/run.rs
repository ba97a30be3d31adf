//! `run` command.

use anyhow::Result;

use crate::config::HalConfig;
use crate::pipeline::{self, TaskRunner};

/// Expand task names and aliases, then run them in order.
pub fn run_tasks(config: &HalConfig, names: &[String]) -> Result<()> {
    let tasks = pipeline::expand(names)?;
    TaskRunner::new(config).run(&tasks)
}
