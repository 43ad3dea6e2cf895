//! Settings layering and the bridge into watch options.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use sitewatch::{Settings, WatchOptions};

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.version, 1);
    assert_eq!(settings.watch.debounce_ms, 300);
    assert!(settings.watch.ignore.is_none());
    assert_eq!(settings.logging.default, "warn");
    assert!(settings.logging.modules.is_empty());
}

#[test]
fn test_toml_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sitewatch.toml");
    fs::write(
        &path,
        "[watch]\ndebounce_ms = 150\nignore = [\"drafts\", \".tmp\"]\n\n[logging]\ndefault = \"info\"\n",
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();

    assert_eq!(settings.watch.debounce_ms, 150);
    assert_eq!(
        settings.watch.ignore,
        Some(vec!["drafts".to_string(), ".tmp".to_string()])
    );
    assert_eq!(settings.logging.default, "info");
    // Untouched fields keep their defaults.
    assert_eq!(settings.version, 1);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load_from(temp_dir.path().join("sitewatch.toml")).unwrap();
    assert_eq!(settings.watch.debounce_ms, 300);
}

#[test]
fn test_save_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/sitewatch.toml");

    let mut settings = Settings::default();
    settings.watch.debounce_ms = 450;
    settings.watch.ignore = Some(vec!["generated".to_string()]);
    settings.save(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded.watch.debounce_ms, 450);
    assert_eq!(loaded.watch.ignore, Some(vec!["generated".to_string()]));
}

#[test]
fn test_watch_options_bridge() {
    // Unset ignore means the built-in defaults.
    let settings = Settings::default();
    let opts = WatchOptions::from_settings(&settings);
    assert_eq!(opts.debounce, Duration::from_millis(300));
    assert!(opts.ignore.is_ignored(Path::new("node_modules/pkg/index.js")));

    // A configured list replaces the defaults wholesale.
    let mut settings = Settings::default();
    settings.watch.debounce_ms = 500;
    settings.watch.ignore = Some(vec!["drafts".to_string()]);
    let opts = WatchOptions::from_settings(&settings);
    assert_eq!(opts.debounce, Duration::from_millis(500));
    assert!(opts.ignore.is_ignored(Path::new("docs/drafts/wip.md")));
    assert!(!opts.ignore.is_ignored(Path::new("node_modules/pkg/index.js")));
}

#[test]
fn test_logging_init_is_idempotent() {
    sitewatch::logging::init();
    // Second call is a no-op, not a panic.
    sitewatch::logging::init();
}
