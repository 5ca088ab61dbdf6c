//! Test plan for the `huddle-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and the legacy variables.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use huddle_config::{load, AppConfig, HttpConfig, RealtimeConfig, UploadConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "CHAT_DATABASE_URL",
    "PORT",
    "HUDDLE_CONFIG",
    "HUDDLE__DATABASE__MAX_CONNECTIONS",
    "HUDDLE__DATABASE__URL",
    "HUDDLE__HTTP__ADDRESS",
    "HUDDLE__HTTP__PORT",
    "HUDDLE__REALTIME__CHANNEL_CAPACITY",
    "HUDDLE__REALTIME__SEND_TIMEOUT_MS",
    "HUDDLE__UPLOADS__DIRECTORY",
    "HUDDLE__UPLOADS__MAX_FILE_BYTES",
    "HUDDLE__UPLOADS__PUBLIC_PATH",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let (_temp_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(config.uploads.directory, defaults.uploads.directory);
    assert_eq!(config.uploads.public_path, defaults.uploads.public_path);
    assert_eq!(
        config.realtime.channel_capacity,
        defaults.realtime.channel_capacity
    );
    assert_eq!(
        config.realtime.send_timeout_ms,
        defaults.realtime.send_timeout_ms
    );
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "huddle.toml",
        r#"
        [http]
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/huddle.toml",
        r#"
        [http]
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "huddle.toml",
        r#"
        [http]
        port = 8181

        [realtime]
        channel_capacity = 8
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.http.port, 8181);
    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.realtime.channel_capacity, 8);
    assert_eq!(
        config.realtime.send_timeout_ms,
        defaults.realtime.send_timeout_ms
    );
    assert_eq!(config.database.url, defaults.database.url);
}

#[test]
#[serial]
fn load_reads_explicit_config_path() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [uploads]
        directory = "/var/lib/huddle/files"
        "#,
    );
    ctx.set_var(
        "HUDDLE_CONFIG",
        temp_dir.path().join("elsewhere/custom.toml").display().to_string(),
    );

    let config = load().expect("configuration load should read HUDDLE_CONFIG");
    assert_eq!(config.uploads.directory, "/var/lib/huddle/files");
    assert_eq!(config.uploads.public_path, "/uploads");
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "huddle.toml",
        r#"
        [http]
        port = 3030
        "#,
    );

    ctx.set_var("HUDDLE__HTTP__PORT", "8080");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
}

#[test]
#[serial]
fn legacy_variables_override_everything_else() {
    let (_temp_dir, mut ctx) = isolated();

    ctx.set_var("HUDDLE__HTTP__PORT", "8080");
    ctx.set_var("PORT", "9090");
    ctx.set_var("CHAT_DATABASE_URL", "sqlite://legacy.sqlite");

    let config = load().expect("configuration load should honour legacy variables");
    assert_eq!(config.http.port, 9090);
    assert_eq!(config.database.url, "sqlite://legacy.sqlite");
}

#[test]
#[serial]
fn load_rejects_zero_channel_capacity() {
    let (_temp_dir, mut ctx) = isolated();

    ctx.set_var("HUDDLE__REALTIME__CHANNEL_CAPACITY", "0");

    let error = load().expect_err("zero capacity should be rejected");
    assert!(error.to_string().contains("channel_capacity"));
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "huddle.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "0.0.0.0");
    assert_eq!(defaults.port, 3000);
}

#[test]
fn upload_and_realtime_defaults() {
    let uploads = UploadConfig::default();
    assert_eq!(uploads.directory, "uploads");

    let realtime = RealtimeConfig::default();
    assert_eq!(realtime.channel_capacity, 64);
    assert_eq!(realtime.send_timeout_ms, 5_000);
}

#[test]
#[serial]
fn load_rejects_root_public_path() {
    let (_temp_dir, mut ctx) = isolated();

    ctx.set_var("HUDDLE__UPLOADS__PUBLIC_PATH", "/");

    let error = load().expect_err("root public path should be rejected");
    assert!(error.to_string().contains("uploads.public_path"));
}
