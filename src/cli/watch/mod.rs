//! `watch` command: recompile the stylesheet when a LESS source changes.
//!
//! ```text
//! notify → Debouncer → less + postcss → watch status line
//! ```
//!
//! The watcher starts before the first event is read, so edits made while
//! a rebuild runs are buffered and picked up by the next one.

mod debouncer;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossbeam::channel::{self, RecvTimeoutError};
use notify::{RecursiveMode, Watcher};

use crate::config::{HalConfig, cfg};
use crate::core::{is_shutdown, register_shutdown_channel};
use crate::logger::{status_error, status_success};
use crate::pipeline::{Task, TaskRunner};
use crate::{debug, log};

use debouncer::{ChangeKind, Debouncer};

/// Upper bound on a single blocking wait, so shutdown is noticed promptly.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Tasks run for every batch of changes.
const REBUILD: [Task; 2] = [Task::Less, Task::Postcss];

pub fn watch(config: &HalConfig) -> Result<()> {
    let roots = watch_roots(config);
    if roots.is_empty() {
        bail!(
            "no LESS directory to watch (looked in {} and {})",
            config.root_relative(&config.paths.less).display(),
            config.root_relative(config.theme_less_dir()).display()
        );
    }

    let (event_tx, event_rx) = channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .context("Failed to create file watcher")?;

    for root in &roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;
        log!("watch"; "watching {}", config.root_relative(root).display());
    }

    let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
    register_shutdown_channel(shutdown_tx);

    let mut debouncer = Debouncer::new();

    loop {
        if is_shutdown() || shutdown_rx.try_recv().is_ok() {
            break;
        }

        match event_rx.recv_timeout(debouncer.sleep_duration(POLL_INTERVAL)) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(e)) => log!("watch"; "watcher error: {e}"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(changes) = debouncer.take_if_ready() {
            rebuild(&changes);
        }
    }

    log!("watch"; "stopped");
    Ok(())
}

/// Existing directories among the project LESS dir and the theme LESS dir.
fn watch_roots(config: &HalConfig) -> Vec<PathBuf> {
    let mut roots = vec![config.paths.less.clone()];
    let theme_less = config.theme_less_dir();
    if !theme_less.starts_with(&config.paths.less) {
        roots.push(theme_less);
    }
    roots.retain(|root| root.is_dir());
    roots
}

/// Run the rebuild tasks against the global config with a fresh banner date.
fn rebuild(changes: &[(PathBuf, ChangeKind)]) {
    let config = cfg();
    for (path, kind) in changes {
        debug!("watch"; "{} {}", kind.label(), config.root_relative(path).display());
    }

    let summary = match changes {
        [(path, _)] => config.root_relative(path).display().to_string(),
        _ => format!("{} files", changes.len()),
    };

    match TaskRunner::new(&config).run(&REBUILD) {
        Ok(()) => status_success(&format!("rebuilt {} ({summary})", config.css.output.display())),
        Err(e) => status_error(&format!("rebuild failed ({summary})"), &format!("{e:#}")),
    }
}
