//! Watch session lifecycle and the event loop.
//!
//! One session observes one root directory from `start` to `stop`. All
//! bookkeeping (the watch tree and the pending debounce entries) is owned
//! outright by a dedicated event thread, so registration triggered by a
//! background event and teardown triggered by the caller never race over
//! shared state: the caller only holds a shutdown channel and the thread
//! handle.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use notify::Event;

use crate::config::Settings;

use super::debounce::Debouncer;
use super::error::WatchError;
use super::event::{ChangeEvent, ChangeKind, raw_change_kind};
use super::ignore::IgnoreRules;
use super::tree::WatchTree;

/// How often the event thread drains settled debounce entries.
const SETTLE_POLL: Duration = Duration::from_millis(50);

/// Default debounce window.
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Per-session tuning: the debounce window and the ignore rule set.
///
/// The rule set here is the single source of truth for the session - the
/// same instance gates directory registration and event recording.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Delay after the last raw event before a path is considered settled.
    pub debounce: Duration,
    /// Paths matching these rules are neither watched nor reported.
    pub ignore: IgnoreRules,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            ignore: IgnoreRules::default(),
        }
    }
}

impl WatchOptions {
    /// Bridge from the config layer.
    ///
    /// `[watch] ignore` unset means the default rule set; set, it replaces
    /// the defaults wholesale, even when empty.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            debounce: Duration::from_millis(settings.watch.debounce_ms),
            ignore: match &settings.watch.ignore {
                Some(names) => IgnoreRules::custom(names.iter().cloned()),
                None => IgnoreRules::default(),
            },
        }
    }
}

/// A lifecycle-bounded watch over one directory tree.
///
/// `start` walks the root synchronously, registers a non-recursive watch
/// per directory, and spawns the event thread. `stop` (or drop) joins that
/// thread, which releases every native registration and cancels every
/// pending debounce entry - no notification begins after `stop` returns.
pub struct WatchSession {
    inner: Option<Running>,
}

struct Running {
    root: PathBuf,
    shutdown_tx: Sender<()>,
    thread: JoinHandle<()>,
}

impl WatchSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self { inner: None }
    }

    /// The root currently being watched, if any.
    pub fn root(&self) -> Option<&Path> {
        self.inner.as_ref().map(|running| running.root.as_path())
    }

    /// Whether the session is currently watching.
    pub fn is_watching(&self) -> bool {
        self.inner.is_some()
    }

    /// Begin observing `root` and, recursively, every subdirectory the
    /// ignore rules allow.
    ///
    /// The initial walk happens on the caller's thread; directories that
    /// cannot be read or watched are skipped with a warning. Only the root
    /// itself is load-bearing: a missing or unwatchable root fails the
    /// start. Starting an already-running session returns
    /// [`WatchError::AlreadyWatching`] and leaves it untouched.
    ///
    /// `on_change` is invoked from the event thread, once per settled path.
    pub fn start<F>(
        &mut self,
        root: impl AsRef<Path>,
        options: WatchOptions,
        on_change: F,
    ) -> Result<(), WatchError>
    where
        F: Fn(ChangeEvent) + Send + 'static,
    {
        if let Some(running) = &self.inner {
            return Err(WatchError::AlreadyWatching {
                root: running.root.clone(),
            });
        }

        let root = root.as_ref();
        let is_dir = fs::metadata(root)
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(WatchError::RootNotFound {
                root: root.to_path_buf(),
            });
        }
        // Canonical root so every reported path is absolute and stable.
        let root = root.canonicalize().map_err(|_| WatchError::RootNotFound {
            root: root.to_path_buf(),
        })?;

        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = event_tx.send(res);
        })?;

        let mut tree = WatchTree::new(watcher);
        tree.register(&root)
            .map_err(|err| WatchError::RootWatchFailed {
                root: root.clone(),
                reason: err.to_string(),
            })?;
        // Initial walk: register directories only. Pre-existing files are
        // the baseline, not changes.
        tree.register_subtree(&root, &options.ignore, |_file| {});

        crate::log_event!(
            "watcher",
            "started",
            "{} ({} directories)",
            root.display(),
            tree.len()
        );

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let event_loop = EventLoop {
            tree,
            debouncer: Debouncer::new(options.debounce),
            rules: options.ignore,
            on_change: Box::new(on_change),
        };
        let thread = thread::Builder::new()
            .name("sitewatch-events".to_string())
            .spawn(move || event_loop.run(event_rx, shutdown_rx))
            .map_err(|err| WatchError::InitFailed {
                reason: err.to_string(),
            })?;

        self.inner = Some(Running {
            root,
            shutdown_tx,
            thread,
        });
        Ok(())
    }

    /// Stop watching and release every native registration.
    ///
    /// Idempotent: stopping an idle session is a no-op. Joins the event
    /// thread, so a callback already in flight completes before this
    /// returns and no new one begins afterwards.
    pub fn stop(&mut self) {
        let Some(running) = self.inner.take() else {
            return;
        };
        let _ = running.shutdown_tx.send(());
        if running.thread.join().is_err() {
            tracing::error!("[watcher] event thread panicked during shutdown");
        }
        crate::log_event!("watcher", "stopped", "{}", running.root.display());
    }
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State owned by the event thread.
struct EventLoop {
    tree: WatchTree,
    debouncer: Debouncer,
    rules: IgnoreRules,
    on_change: Box<dyn Fn(ChangeEvent) + Send>,
}

impl EventLoop {
    fn run(mut self, event_rx: Receiver<notify::Result<Event>>, shutdown_rx: Receiver<()>) {
        loop {
            crossbeam_channel::select! {
                recv(shutdown_rx) -> _ => break,
                recv(event_rx) -> msg => match msg {
                    Ok(Ok(event)) => self.handle_raw(event),
                    Ok(Err(err)) => {
                        tracing::error!("[watcher] event stream error: {err}");
                    }
                    Err(_) => break,
                },
                default(SETTLE_POLL) => {}
            }

            // Shutdown wins over draining: entries still pending when stop
            // arrives are cancelled, not fired.
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            self.drain_settled();
        }
        self.debouncer.clear();
    }

    /// Record one raw notify event, growing the tree on directory discovery.
    fn handle_raw(&mut self, event: Event) {
        let Some(kind) = raw_change_kind(&event.kind) else {
            return;
        };

        for path in event.paths {
            if self.rules.is_ignored(&path) {
                crate::debug_event!("watcher", "ignored", "{}", path.display());
                continue;
            }

            // A structural event that reveals a live directory grows the
            // tree right here, before any later event is examined, so
            // nothing inside it goes unobserved. The directory itself never
            // notifies.
            if kind == ChangeKind::Structural && path.is_dir() {
                self.adopt_directory(&path);
                continue;
            }

            self.debouncer.record(path, kind);
        }
    }

    fn drain_settled(&mut self) {
        for (path, kind) in self.debouncer.take_settled() {
            self.settle(path, kind);
        }
    }

    /// Classify a settled path by re-statting it and notify the consumer.
    fn settle(&mut self, path: PathBuf, kind: ChangeKind) {
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                // Late directory discovery (e.g. a metadata-only event):
                // make sure the subtree is observed, emit nothing.
                self.adopt_directory(&path);
            }
            Ok(_) => {
                crate::debug_event!("watcher", "changed", "{}", path.display());
                (self.on_change)(ChangeEvent { path, kind });
            }
            Err(_) => {
                // Vanished between event and stat: an expected race,
                // reported as a deletion.
                crate::debug_event!("watcher", "removed", "{}", path.display());
                (self.on_change)(ChangeEvent {
                    path,
                    kind: ChangeKind::Structural,
                });
            }
        }
    }

    /// Register a discovered directory and announce its current files.
    ///
    /// Files already inside the directory are fed through the debouncer as
    /// structural changes: they may have been created before the watch
    /// registration took effect, and the coalescer collapses the
    /// announcement with any raw events that did arrive.
    fn adopt_directory(&mut self, dir: &Path) {
        if self.tree.contains(dir) {
            return;
        }
        let Self {
            tree,
            debouncer,
            rules,
            ..
        } = self;
        tree.register_subtree(dir, rules, |file| {
            debouncer.record(file, ChangeKind::Structural);
        });
        crate::log_event!("watcher", "adopted", "{}", dir.display());
    }
}
