//! End-to-end tests for the savecache binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated config directory
fn savecache(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("savecache").unwrap();
    cmd.env("SAVECACHE_CONFIG_DIR", config.path())
        .env_remove("SAVECACHE_RETENTION")
        .env_remove("SAVECACHE_LOG");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn rotate_moves_backups_and_prints_summary() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write(work.path(), "doc.blend1", "one");
    write(work.path(), "doc.blend2", "two");
    write(work.path(), "doc.blend3", "three");

    savecache(&config)
        .arg("rotate")
        .arg(work.path())
        .arg("doc")
        .args(["--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup file(s) moved from"));

    let cache = work.path().join("__savecache__");
    assert_eq!(fs::read_to_string(cache.join("doc.blend1")).unwrap(), "one");
    assert_eq!(fs::read_to_string(cache.join("doc.blend2")).unwrap(), "two");
    assert!(!cache.join("doc.blend3").exists());
    assert!(!work.path().join("doc.blend3").exists());
}

#[test]
fn on_save_derives_document_from_path() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write(work.path(), "scene.blend", "current");
    write(work.path(), "scene.blend1", "backup");

    savecache(&config)
        .arg("on-save")
        .arg(work.path().join("scene.blend"))
        .assert()
        .success();

    assert!(work.path().join("scene.blend").exists());
    assert!(work
        .path()
        .join("__savecache__")
        .join("scene.blend1")
        .exists());
}

#[test]
fn on_save_reads_limit_from_env() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write(work.path(), "scene.blend1", "backup");

    savecache(&config)
        .env("SAVECACHE_RETENTION", "0")
        .arg("on-save")
        .arg(work.path().join("scene.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"));

    assert!(work.path().join("scene.blend1").exists());
    assert!(!work.path().join("__savecache__").exists());
}

#[test]
fn quiet_suppresses_summary() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write(work.path(), "scene.blend1", "backup");

    savecache(&config)
        .arg("--quiet")
        .arg("on-save")
        .arg(work.path().join("scene.blend"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn settings_file_controls_folder_name() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::write(
        config.path().join("config.json"),
        r#"{"retention_limit": 1, "cache_folder_name": ".backups", "print_info": false}"#,
    )
    .unwrap();
    write(work.path(), "scene.blend1", "newer");
    write(work.path(), "scene.blend2", "older");

    savecache(&config)
        .arg("on-save")
        .arg(work.path().join("scene.blend"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let cache = work.path().join(".backups");
    assert_eq!(fs::read_to_string(cache.join("scene.blend1")).unwrap(), "newer");
    assert!(!cache.join("scene.blend2").exists());
}

#[test]
fn on_save_without_extension_fails() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    savecache(&config)
        .arg("on-save")
        .arg(work.path().join("Makefile"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no extension"));
}

#[test]
fn list_shows_cached_backups() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let cache = work.path().join("__savecache__");
    fs::create_dir(&cache).unwrap();
    write(&cache, "scene.blend1", "a");
    write(&cache, "scene.blend2", "b");

    savecache(&config)
        .arg("list")
        .arg(work.path().join("scene.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("scene.blend1"))
        .stdout(predicate::str::contains("Total: 2 backup(s)"));
}

#[test]
fn list_without_cache_folder() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    savecache(&config)
        .arg("list")
        .arg(work.path().join("scene.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached backups"));
}

#[test]
fn prune_enforces_lowered_limit() {
    let config = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let cache = work.path().join("__savecache__");
    fs::create_dir(&cache).unwrap();
    for index in 1..=4 {
        write(&cache, &format!("scene.blend{}", index), "x");
    }

    savecache(&config)
        .arg("prune")
        .arg(work.path().join("scene.blend"))
        .args(["--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned 3 backup(s)."));

    assert!(cache.join("scene.blend1").exists());
    assert!(!cache.join("scene.blend2").exists());
}

#[test]
fn init_writes_settings_once() {
    let config = TempDir::new().unwrap();

    savecache(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings written"));
    assert!(config.path().join("config.json").exists());

    savecache(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));
}

#[test]
fn config_shows_defaults() {
    let config = TempDir::new().unwrap();

    savecache(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Retention limit:   2"))
        .stdout(predicate::str::contains("__savecache__"));
}
