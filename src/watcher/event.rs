//! Change notification types and raw event reclassification.

use std::path::PathBuf;

use notify::EventKind;
use notify::event::ModifyKind;

/// What kind of change settled for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// In-place content modification of an existing file.
    Content,
    /// Create, rename, or delete. The raw event alone does not say which;
    /// the classifier re-stats the path to find out what remains.
    Structural,
}

/// The unit delivered to the rebuild callback: one settled path and the
/// kind of change observed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path that changed.
    pub path: PathBuf,
    /// Kind of change, coalesced over the debounce window.
    pub kind: ChangeKind,
}

/// Map a raw notify event kind onto our two-kind model.
///
/// Returns `None` for events that carry no tree-content signal (access,
/// backend-specific noise).
pub(crate) fn raw_change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => Some(ChangeKind::Structural),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Structural),
        EventKind::Modify(_) => Some(ChangeKind::Content),
        EventKind::Access(_) | EventKind::Other => None,
        EventKind::Any => Some(ChangeKind::Content),
    }
}
