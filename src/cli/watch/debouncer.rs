//! Event debouncing for the LESS watcher.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::utils::path::normalize_path;

pub(super) const DEBOUNCE_MS: u64 = 300;
pub(super) const REBUILD_COOLDOWN_MS: u64 = 800;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Collects `.less` changes until the event stream has been quiet for
/// `DEBOUNCE_MS`, and keeps rebuilds at least `REBUILD_COOLDOWN_MS` apart.
pub(super) struct Debouncer {
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
    last_compile: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            last_compile: None,
        }
    }

    /// Record a notify event.
    ///
    /// Deduplication per path:
    /// - Removed then Created/Modified: restored, keep the new kind
    /// - Modified then Removed: Removed
    /// - Created then Removed: dropped
    /// - anything else: first event wins
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        self.add_event_at(event, Instant::now());
    }

    fn add_event_at(&mut self, event: &notify::Event, now: Instant) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // mtime/chmod noise
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        for path in &event.paths {
            if !is_less_source(path) {
                continue;
            }
            let path = normalize_path(path);

            match self.changes.get(&path).copied() {
                None => {
                    crate::debug!("watch"; "{} {}", kind.label(), path.display());
                    self.changes.insert(path, kind);
                }
                Some(existing) => match (existing, kind) {
                    (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                        self.changes.insert(path, kind);
                    }
                    (ChangeKind::Modified, ChangeKind::Removed) => {
                        self.changes.insert(path, ChangeKind::Removed);
                    }
                    (ChangeKind::Created, ChangeKind::Removed) => {
                        self.changes.remove(&path);
                    }
                    _ => {}
                },
            }
            self.last_event = Some(now);
        }

        // a batch that cancelled out leaves nothing to wait for
        if self.changes.is_empty() {
            self.last_event = None;
        }
    }

    /// Take the pending changes once the debounce window and the rebuild
    /// cooldown have both elapsed.
    pub(super) fn take_if_ready(&mut self) -> Option<Vec<(PathBuf, ChangeKind)>> {
        self.take_if_ready_at(Instant::now())
    }

    fn take_if_ready_at(&mut self, now: Instant) -> Option<Vec<(PathBuf, ChangeKind)>> {
        if !self.is_ready_at(now) {
            return None;
        }

        self.last_event = None;
        self.last_compile = Some(now);

        let mut changes: Vec<_> = std::mem::take(&mut self.changes).into_iter().collect();
        changes.sort_by(|a, b| a.0.cmp(&b.0));
        Some(changes)
    }

    fn is_ready_at(&self, now: Instant) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if now.saturating_duration_since(last_event) < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }

        if let Some(last_compile) = self.last_compile
            && now.saturating_duration_since(last_compile)
                < Duration::from_millis(REBUILD_COOLDOWN_MS)
        {
            return false;
        }

        !self.changes.is_empty()
    }

    /// How long the watch loop may block before the next check.
    pub(super) fn sleep_duration(&self, max: Duration) -> Duration {
        self.sleep_duration_at(max, Instant::now())
    }

    fn sleep_duration_at(&self, max: Duration, now: Instant) -> Duration {
        let Some(last_event) = self.last_event else {
            return max;
        };
        if self.changes.is_empty() {
            return max;
        }

        let debounce_remaining = Duration::from_millis(DEBOUNCE_MS)
            .saturating_sub(now.saturating_duration_since(last_event));
        let cooldown_remaining = self
            .last_compile
            .map(|t| {
                Duration::from_millis(REBUILD_COOLDOWN_MS)
                    .saturating_sub(now.saturating_duration_since(t))
            })
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .clamp(Duration::from_millis(1), max)
    }
}

/// `.less` files, minus editor backups and hidden files.
fn is_less_source(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    path.extension().is_some_and(|ext| ext == "less")
        && !name.starts_with('.')
        && !name.ends_with('~')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify_kind() -> notify::EventKind {
        notify::EventKind::Modify(notify::event::ModifyKind::Data(
            notify::event::DataChange::Any,
        ))
    }

    fn create_kind() -> notify::EventKind {
        notify::EventKind::Create(notify::event::CreateKind::File)
    }

    fn remove_kind() -> notify::EventKind {
        notify::EventKind::Remove(notify::event::RemoveKind::File)
    }

    fn after(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_empty_is_not_ready() {
        let mut debouncer = Debouncer::new();
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        debouncer.add_event_at(&make_event(vec!["/p/less/hal.less"], modify_kind()), start);

        assert!(debouncer.take_if_ready_at(after(start, 100)).is_none());

        let changes = debouncer.take_if_ready_at(after(start, DEBOUNCE_MS)).unwrap();
        assert_eq!(
            changes,
            vec![(PathBuf::from("/p/less/hal.less"), ChangeKind::Modified)]
        );
        assert!(debouncer.take_if_ready_at(after(start, DEBOUNCE_MS + 1)).is_none());
    }

    #[test]
    fn test_ignores_non_less_and_metadata() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        debouncer.add_event_at(&make_event(vec!["/p/less/hal.css"], modify_kind()), start);
        debouncer.add_event_at(&make_event(vec!["/p/less/.hal.less"], modify_kind()), start);
        debouncer.add_event_at(&make_event(vec!["/p/less/hal.less~"], modify_kind()), start);
        let metadata = notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
            notify::event::MetadataKind::WriteTime,
        ));
        debouncer.add_event_at(&make_event(vec!["/p/less/hal.less"], metadata), start);

        assert!(debouncer.take_if_ready_at(after(start, 1000)).is_none());
    }

    #[test]
    fn test_dedup_rules() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        // created then removed: dropped
        debouncer.add_event_at(&make_event(vec!["/p/a.less"], create_kind()), start);
        debouncer.add_event_at(&make_event(vec!["/p/a.less"], remove_kind()), start);
        // modified then removed: removed
        debouncer.add_event_at(&make_event(vec!["/p/b.less"], modify_kind()), start);
        debouncer.add_event_at(&make_event(vec!["/p/b.less"], remove_kind()), start);
        // removed then created: restored
        debouncer.add_event_at(&make_event(vec!["/p/c.less"], remove_kind()), start);
        debouncer.add_event_at(&make_event(vec!["/p/c.less"], create_kind()), start);
        // first wins
        debouncer.add_event_at(&make_event(vec!["/p/d.less"], create_kind()), start);
        debouncer.add_event_at(&make_event(vec!["/p/d.less"], modify_kind()), start);

        let changes = debouncer.take_if_ready_at(after(start, DEBOUNCE_MS)).unwrap();
        assert_eq!(
            changes,
            vec![
                (PathBuf::from("/p/b.less"), ChangeKind::Removed),
                (PathBuf::from("/p/c.less"), ChangeKind::Created),
                (PathBuf::from("/p/d.less"), ChangeKind::Created),
            ]
        );
    }

    #[test]
    fn test_cooldown_between_rebuilds() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        debouncer.add_event_at(&make_event(vec!["/p/a.less"], modify_kind()), start);
        assert!(debouncer.take_if_ready_at(after(start, DEBOUNCE_MS)).is_some());

        let second = after(start, DEBOUNCE_MS + 10);
        debouncer.add_event_at(&make_event(vec!["/p/a.less"], modify_kind()), second);
        assert!(debouncer.take_if_ready_at(after(second, DEBOUNCE_MS)).is_none());
        assert!(
            debouncer
                .take_if_ready_at(after(start, DEBOUNCE_MS + REBUILD_COOLDOWN_MS))
                .is_some()
        );
    }

    #[test]
    fn test_cancelled_batch_goes_idle() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        debouncer.add_event_at(&make_event(vec!["/p/a.less"], create_kind()), start);
        debouncer.add_event_at(&make_event(vec!["/p/a.less"], remove_kind()), start);

        let later = after(start, DEBOUNCE_MS + 50);
        assert!(debouncer.take_if_ready_at(later).is_none());
        let max = Duration::from_millis(500);
        assert_eq!(debouncer.sleep_duration_at(max, later), max);
    }

    #[test]
    fn test_sleep_duration_tracks_debounce() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        let max = Duration::from_millis(500);
        assert_eq!(debouncer.sleep_duration_at(max, start), max);

        debouncer.add_event_at(&make_event(vec!["/p/a.less"], modify_kind()), start);
        assert_eq!(
            debouncer.sleep_duration_at(max, after(start, 100)),
            Duration::from_millis(DEBOUNCE_MS - 100)
        );
        assert_eq!(
            debouncer.sleep_duration_at(max, after(start, 1000)),
            Duration::from_millis(1)
        );
    }
}
