//! Incremental change watching for the rebuild pipeline.
//!
//! Observes a directory tree, coalesces bursts of raw events, and notifies
//! the rebuild callback exactly once per meaningfully-changed path.
//!
//! # Architecture
//!
//! ```text
//! WatchSession
//!   - WatchTree: one non-recursive notify registration per directory
//!   - IgnoreRules: gates registration and event recording alike
//!   - Debouncer: per-path settle windows, structural kind is sticky
//!   - event thread: classify settled paths (re-stat) -> on_change
//! ```
//!
//! New directories discovered mid-session are adopted immediately, so
//! their contents are observed without a restart. `stop` joins the event
//! thread; no notification begins after it returns.

mod debounce;
mod error;
mod event;
mod ignore;
mod session;
mod tree;

pub use debounce::Debouncer;
pub use error::WatchError;
pub use event::{ChangeEvent, ChangeKind};
pub use ignore::IgnoreRules;
pub use session::{WatchOptions, WatchSession};
