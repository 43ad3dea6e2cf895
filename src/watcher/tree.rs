//! Watch-tree registry: one native watch registration per directory.
//!
//! Directories are watched non-recursively; the tree grows by explicit
//! registration, at start from the initial walk and mid-session when an
//! event reveals a new directory. Registration is guarded by the watched
//! set, so re-registering a directory is a no-op and reactive discovery
//! stays idempotent under races.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use walkdir::WalkDir;

use super::ignore::IgnoreRules;

pub(crate) struct WatchTree {
    watcher: RecommendedWatcher,
    registered: HashSet<PathBuf>,
}

impl WatchTree {
    pub(crate) fn new(watcher: RecommendedWatcher) -> Self {
        Self {
            watcher,
            registered: HashSet::new(),
        }
    }

    /// Register one directory, returning whether it is newly watched.
    ///
    /// An already-registered directory returns `Ok(false)` without touching
    /// the native watcher. The caller decides what a failure means: fatal
    /// for the root, logged-and-skipped for a subtree.
    pub(crate) fn register(&mut self, dir: &Path) -> Result<bool, notify::Error> {
        if self.registered.contains(dir) {
            return Ok(false);
        }
        self.watcher.watch(dir, RecursiveMode::NonRecursive)?;
        self.registered.insert(dir.to_path_buf());
        crate::debug_event!("watch-tree", "registered", "{}", dir.display());
        Ok(true)
    }

    /// Walk `root` and register every directory the rules allow.
    ///
    /// Each file encountered is handed to `on_file`; the initial walk
    /// passes a no-op, mid-session adoption announces files through the
    /// debouncer so none are lost to the registration race. Unreadable
    /// entries are skipped, and a registration failure degrades only that
    /// subtree.
    pub(crate) fn register_subtree(
        &mut self,
        root: &Path,
        rules: &IgnoreRules,
        mut on_file: impl FnMut(PathBuf),
    ) {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !rules.is_ignored(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(
                        "[watch-tree] skipping unreadable entry under {}: {err}",
                        root.display()
                    );
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if let Err(err) = self.register(entry.path()) {
                    tracing::warn!(
                        "[watch-tree] failed to watch {}: {err}",
                        entry.path().display()
                    );
                }
            } else if entry.file_type().is_file() {
                on_file(entry.path().to_path_buf());
            }
        }
    }

    /// Check if a directory is already registered.
    pub(crate) fn contains(&self, dir: &Path) -> bool {
        self.registered.contains(dir)
    }

    /// Number of registered directories.
    pub(crate) fn len(&self) -> usize {
        self.registered.len()
    }
}
