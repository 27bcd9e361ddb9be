#[path = "../src/config.rs"]
mod config;

use config::{AppConfig, AppConfigOverrides};
use serial_test::serial;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
#[serial]
fn test_defaults_without_config_file() {
    let dir = tempdir().unwrap();
    std::env::set_var("HOME", dir.path());

    let cfg = AppConfig::load_from(Some(dir.path().join("missing")));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.backend_url, api_client::DEFAULT_BACKEND_URL);
    assert_eq!(cfg.cache_path, dir.path().join(".lightbox"));
    assert!(cfg.previews_dir.ends_with("lightbox"));
    assert!(!cfg.grid_size_per_directory);
    assert!(!cfg.debug_console);
    assert!(!cfg.trace_spans);
}

#[test]
#[serial]
fn test_values_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config");
    std::fs::write(
        &path,
        "log_level = \"debug\"\nbackend_url = \"http://10.0.0.2:7000\"\ngrid_size_per_directory = true\npreviews_dir = \"/tmp/previews\"\n",
    )
    .unwrap();

    let cfg = AppConfig::load_from(Some(path));
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.backend_url, "http://10.0.0.2:7000");
    assert_eq!(cfg.previews_dir, PathBuf::from("/tmp/previews"));
    assert!(cfg.grid_size_per_directory);
}

#[test]
#[serial]
fn test_overrides_win() {
    let dir = tempdir().unwrap();
    let cfg = AppConfig::load_from(Some(dir.path().join("missing"))).apply_overrides(
        &AppConfigOverrides {
            log_level: Some("trace".into()),
            backend_url: Some("http://localhost:1".into()),
            previews_dir: Some(PathBuf::from("/data/previews")),
            grid_size_per_directory: true,
            debug_console: true,
            trace_spans: false,
        },
    );
    assert_eq!(cfg.log_level, "trace");
    assert_eq!(cfg.backend_url, "http://localhost:1");
    assert_eq!(cfg.previews_dir, PathBuf::from("/data/previews"));
    assert!(cfg.grid_size_per_directory);
    assert!(cfg.debug_console);
    assert!(!cfg.trace_spans);
}

#[test]
#[serial]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config");
    let mut cfg = AppConfig::load_from(Some(path.clone()));
    cfg.log_level = "warn".into();
    cfg.cache_path = dir.path().join("cache");
    cfg.save_to(Some(path.clone())).unwrap();

    let reloaded = AppConfig::load_from(Some(path));
    assert_eq!(reloaded, cfg);
}
