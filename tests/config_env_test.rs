use sitewatch::Settings;
use std::env;
use tempfile::TempDir;

/// Environment variables are process-global, so this file holds a single
/// test and runs as its own binary.
#[test]
fn test_env_overrides_file_and_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sitewatch.toml");
    std::fs::write(&path, "[watch]\ndebounce_ms = 150\n").unwrap();

    unsafe {
        // Double underscore separates nested levels.
        env::set_var("SITEWATCH_WATCH__DEBOUNCE_MS", "450");
        env::set_var("SITEWATCH_LOGGING__DEFAULT", "debug");
    }

    let settings = Settings::load_from(&path).unwrap();

    assert_eq!(
        settings.watch.debounce_ms, 450,
        "env must override the config file"
    );
    assert_eq!(settings.logging.default, "debug");

    unsafe {
        env::remove_var("SITEWATCH_WATCH__DEBOUNCE_MS");
        env::remove_var("SITEWATCH_LOGGING__DEFAULT");
    }
}
