pub mod config;
pub mod logging;
pub mod watcher;

pub use config::Settings;
pub use watcher::{ChangeEvent, ChangeKind, IgnoreRules, WatchError, WatchOptions, WatchSession};
