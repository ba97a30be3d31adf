//! Asset pipeline.
//!
//! Tasks run sequentially in the order given; aliases expand into fixed
//! task lists:
//!
//! ```text
//! dev  = clean copy:resources concat:dev  less postcss        editor
//! prod = clean copy:resources concat:prod less postcss cssmin editor
//! css  = less postcss copy:css
//! ```
//!
//! A failing task aborts the run.

mod clean;
mod concat;
mod copy;
mod css;
pub mod glob;
mod minify;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};

use crate::config::HalConfig;
use crate::log;
use crate::utils::date::DateTimeUtc;

/// A single pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Clean,
    CopyResources,
    CopyCss,
    ConcatDev,
    ConcatProd,
    Less,
    Postcss,
    Cssmin,
    Editor,
}

impl Task {
    pub const ALL: [Task; 9] = [
        Task::Clean,
        Task::CopyResources,
        Task::CopyCss,
        Task::ConcatDev,
        Task::ConcatProd,
        Task::Less,
        Task::Postcss,
        Task::Cssmin,
        Task::Editor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Task::Clean => "clean",
            Task::CopyResources => "copy:resources",
            Task::CopyCss => "copy:css",
            Task::ConcatDev => "concat:dev",
            Task::ConcatProd => "concat:prod",
            Task::Less => "less",
            Task::Postcss => "postcss",
            Task::Cssmin => "cssmin",
            Task::Editor => "editor",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named task groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alias {
    Dev,
    Prod,
    Css,
}

impl Alias {
    pub fn tasks(self) -> &'static [Task] {
        match self {
            Alias::Dev => &[
                Task::Clean,
                Task::CopyResources,
                Task::ConcatDev,
                Task::Less,
                Task::Postcss,
                Task::Editor,
            ],
            Alias::Prod => &[
                Task::Clean,
                Task::CopyResources,
                Task::ConcatProd,
                Task::Less,
                Task::Postcss,
                Task::Cssmin,
                Task::Editor,
            ],
            Alias::Css => &[Task::Less, Task::Postcss, Task::CopyCss],
        }
    }
}

impl FromStr for Alias {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" | "default" => Ok(Alias::Dev),
            "prod" => Ok(Alias::Prod),
            "css" => Ok(Alias::Css),
            _ => Err(()),
        }
    }
}

/// Expand task names and aliases into an ordered task list.
///
/// `copy` and `concat` without a target run every target of that task.
pub fn expand<S: AsRef<str>>(names: &[S]) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if let Ok(alias) = name.parse::<Alias>() {
            tasks.extend_from_slice(alias.tasks());
            continue;
        }
        match name {
            "copy" => tasks.extend([Task::CopyResources, Task::CopyCss]),
            "concat" => tasks.extend([Task::ConcatDev, Task::ConcatProd]),
            _ => {
                let task = Task::ALL
                    .into_iter()
                    .find(|t| t.name() == name)
                    .ok_or_else(|| anyhow!("unknown task `{name}`"))?;
                tasks.push(task);
            }
        }
    }
    Ok(tasks)
}

/// Runs tasks against one config with a shared build date.
pub struct TaskRunner<'a> {
    config: &'a HalConfig,
    date: String,
}

impl<'a> TaskRunner<'a> {
    pub fn new(config: &'a HalConfig) -> Self {
        Self {
            config,
            date: DateTimeUtc::now().to_banner(),
        }
    }

    /// Run `tasks` in order, stopping at the first failure.
    pub fn run(&self, tasks: &[Task]) -> Result<()> {
        let start = Instant::now();
        for &task in tasks {
            self.run_task(task)
                .with_context(|| format!("task `{task}` failed"))?;
        }
        log!("run"; "{} tasks done in {:.2?}", tasks.len(), start.elapsed());
        Ok(())
    }

    pub fn run_task(&self, task: Task) -> Result<()> {
        let config = self.config;
        log!("run"; "{task}");
        match task {
            Task::Clean => {
                let removed = clean::run(config)?;
                log!("clean"; "{removed} files removed");
            }
            Task::CopyResources => {
                copy::resources(config)?;
            }
            Task::CopyCss => {
                copy::css(config)?;
            }
            Task::ConcatDev => {
                concat::run(config, &config.concat.dev, &self.date)?;
            }
            Task::ConcatProd => {
                concat::run(config, &config.concat.prod, &self.date)?;
            }
            Task::Less => {
                css::less(config, &self.date)?;
            }
            Task::Postcss => {
                css::postcss(config)?;
            }
            Task::Cssmin => {
                css::cssmin(config)?;
            }
            Task::Editor => {
                css::editor(config)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_task_names_roundtrip() {
        for task in Task::ALL {
            assert_eq!(expand(&[task.name()]).unwrap(), vec![task]);
        }
    }

    #[test]
    fn test_expand_aliases() {
        assert_eq!(expand(&["dev"]).unwrap(), Alias::Dev.tasks());
        assert_eq!(expand(&["default"]).unwrap(), Alias::Dev.tasks());
        assert_eq!(
            expand(&["css"]).unwrap(),
            vec![Task::Less, Task::Postcss, Task::CopyCss]
        );
        assert_eq!(expand(&["prod"]).unwrap().len(), 7);
    }

    #[test]
    fn test_expand_mixed_and_grouped() {
        assert_eq!(
            expand(&["clean", "copy", "concat"]).unwrap(),
            vec![
                Task::Clean,
                Task::CopyResources,
                Task::CopyCss,
                Task::ConcatDev,
                Task::ConcatProd
            ]
        );
    }

    #[test]
    fn test_expand_unknown() {
        let err = expand(&["dev", "uglify"]).unwrap_err();
        assert!(err.to_string().contains("uglify"));
    }

    #[test]
    fn test_runner_failure_names_task() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "[paths]\npublic = \"public\"");
        let err = TaskRunner::new(&config).run(&[Task::Postcss]).unwrap_err();
        assert!(err.to_string().contains("task `postcss` failed"));
    }

    #[test]
    fn test_runner_sequence() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("public/css")).unwrap();
        fs::write(root.join("public/css/stale.css"), "x").unwrap();
        fs::write(root.join("public/index.html"), "<html>").unwrap();

        let config = test_config_at(root, "[paths]\npublic = \"public\"");
        TaskRunner::new(&config)
            .run(&[Task::Clean, Task::Editor, Task::Cssmin])
            .unwrap();

        assert!(!root.join("public/css/stale.css").exists());
        assert!(root.join("public/index.html").exists());
        assert!(root.join("public/css/theme-logfile.css").exists());
        assert!(root.join("public/css/theme-logfile.min.css").exists());
    }
}
