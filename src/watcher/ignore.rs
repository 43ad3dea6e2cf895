//! Ignore rules for the watch tree.
//!
//! A path is ignored when any of its segments matches one of the configured
//! names. The defaults cover build output, version-control internals,
//! caches, and OS metadata files. A custom set replaces the defaults
//! wholesale; the two are never merged.
//!
//! The same rule set is consulted at both gates: before a directory is
//! registered for watching, and before a raw event is recorded. Using one
//! set for both keeps the tree and the event stream consistent - we never
//! watch a directory whose events we would then drop, and never drop events
//! from a directory we chose to watch.

use std::path::Path;

/// Names ignored by default, matched against every path segment.
const DEFAULT_IGNORED_NAMES: &[&str] = &[
    "node_modules",
    ".git",
    ".cache",
    "dist",
    "build",
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
];

/// Segment-name ignore matcher.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    names: Vec<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            names: DEFAULT_IGNORED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IgnoreRules {
    /// Build a rule set that replaces the defaults entirely.
    ///
    /// An empty set ignores nothing.
    pub fn custom<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a path matches any ignore rule.
    ///
    /// Matches the basename as well as every intermediate segment, so
    /// `a/node_modules/b.js`, `a/node_modules`, and `node_modules` all
    /// ignore under the defaults.
    pub fn is_ignored(&self, path: &Path) -> bool {
        for component in path.components() {
            if let Some(segment) = component.as_os_str().to_str() {
                if self.names.iter().any(|name| name == segment) {
                    return true;
                }
            }
        }
        false
    }

    /// Number of active rules.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set ignores nothing.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
