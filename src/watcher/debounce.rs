//! Per-path debouncing of raw file events.
//!
//! Editors and build tools emit several raw events for one logical save
//! (write, metadata update, rename-in-place). Coalescing them per path
//! collapses each burst into a single downstream rebuild trigger.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::event::ChangeKind;

/// One pending entry: the last time the path was touched and the kind
/// coalesced so far.
#[derive(Debug, Clone, Copy)]
struct Pending {
    last_event: Instant,
    kind: ChangeKind,
}

/// Debounces file change events by path.
///
/// At most one entry exists per path: a new event for a path that is
/// already pending restarts its window and merges the kind, it never adds
/// a second entry.
#[derive(Debug)]
pub struct Debouncer {
    pending: HashMap<PathBuf, Pending>,
    window: Duration,
}

impl Debouncer {
    /// Create a debouncer with the given settle window.
    pub fn new(window: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            window,
        }
    }

    /// Record a raw event for a path, restarting its window.
    ///
    /// Kind merging is sticky: once a window has seen a structural event
    /// (create, rename, delete), the settled notification stays structural
    /// even if plain writes follow - the path is new to the tree either way.
    pub fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        let now = Instant::now();
        self.pending
            .entry(path)
            .and_modify(|entry| {
                entry.last_event = now;
                if kind == ChangeKind::Structural {
                    entry.kind = ChangeKind::Structural;
                }
            })
            .or_insert(Pending {
                last_event: now,
                kind,
            });
    }

    /// Take every entry whose window has elapsed, removing it.
    pub fn take_settled(&mut self) -> Vec<(PathBuf, ChangeKind)> {
        let now = Instant::now();
        let mut settled = Vec::new();

        self.pending.retain(|path, entry| {
            if now.duration_since(entry.last_event) >= self.window {
                settled.push((path.clone(), entry.kind));
                false
            } else {
                true
            }
        });

        settled
    }

    /// Cancel every pending entry without firing it.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Check if any entries are pending.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of pending entries.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_settles_after_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        let path = PathBuf::from("/proj/docs/guide.md");
        debouncer.record(path.clone(), ChangeKind::Content);

        // Immediately after, nothing has settled.
        assert!(debouncer.take_settled().is_empty());
        assert!(debouncer.has_pending());

        sleep(Duration::from_millis(60));

        let settled = debouncer.take_settled();
        assert_eq!(settled, vec![(path, ChangeKind::Content)]);
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_new_event_restarts_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        let path = PathBuf::from("/proj/docs/guide.md");
        debouncer.record(path.clone(), ChangeKind::Content);

        sleep(Duration::from_millis(30));
        debouncer.record(path.clone(), ChangeKind::Content);

        // 60ms since the first event, but only 30ms since the second.
        sleep(Duration::from_millis(30));
        assert!(debouncer.take_settled().is_empty());

        sleep(Duration::from_millis(30));
        let settled = debouncer.take_settled();
        assert_eq!(settled.len(), 1);
        // Still a single entry for the path.
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[test]
    fn test_structural_kind_is_sticky() {
        let mut debouncer = Debouncer::new(Duration::from_millis(30));

        let path = PathBuf::from("/proj/docs/new.md");
        debouncer.record(path.clone(), ChangeKind::Structural);
        debouncer.record(path.clone(), ChangeKind::Content);
        debouncer.record(path.clone(), ChangeKind::Content);

        sleep(Duration::from_millis(40));

        let settled = debouncer.take_settled();
        assert_eq!(settled, vec![(path, ChangeKind::Structural)]);
    }

    #[test]
    fn test_content_stays_content_without_structural() {
        let mut debouncer = Debouncer::new(Duration::from_millis(30));

        let path = PathBuf::from("/proj/docs/guide.md");
        debouncer.record(path.clone(), ChangeKind::Content);
        debouncer.record(path.clone(), ChangeKind::Content);

        sleep(Duration::from_millis(40));

        let settled = debouncer.take_settled();
        assert_eq!(settled, vec![(path, ChangeKind::Content)]);
    }

    #[test]
    fn test_paths_settle_independently() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        let first = PathBuf::from("/proj/a.md");
        let second = PathBuf::from("/proj/b.md");

        debouncer.record(first.clone(), ChangeKind::Content);
        sleep(Duration::from_millis(30));
        debouncer.record(second.clone(), ChangeKind::Structural);

        sleep(Duration::from_millis(25));

        let settled = debouncer.take_settled();
        assert_eq!(settled, vec![(first, ChangeKind::Content)]);
        assert!(debouncer.has_pending());

        sleep(Duration::from_millis(30));

        let settled = debouncer.take_settled();
        assert_eq!(settled, vec![(second, ChangeKind::Structural)]);
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        debouncer.record(PathBuf::from("/proj/a.md"), ChangeKind::Content);
        debouncer.record(PathBuf::from("/proj/b.md"), ChangeKind::Structural);
        assert_eq!(debouncer.pending_count(), 2);

        debouncer.clear();
        assert!(!debouncer.has_pending());

        sleep(Duration::from_millis(20));
        assert!(debouncer.take_settled().is_empty());
    }
}
