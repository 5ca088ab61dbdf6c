use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "huddle.toml",
    "config/huddle.toml",
    "crates/config/huddle.toml",
    "../huddle.toml",
    "../config/huddle.toml",
];

/// Deployment variables that predate the `HUDDLE__` prefix.
const LEGACY_PORT_VAR: &str = "PORT";
const LEGACY_DATABASE_URL_VAR: &str = "CHAT_DATABASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    const fn default_acquire_timeout() -> u64 {
        30
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://chat.sqlite".to_string(),
            max_connections: 10,
            acquire_timeout_seconds: Self::default_acquire_timeout(),
        }
    }
}

/// Where uploaded message files are written and how they are addressed.
///
/// ```
/// use huddle_config::UploadConfig;
///
/// let uploads = UploadConfig::default();
/// assert_eq!(uploads.public_path, "/uploads");
/// assert_eq!(uploads.max_file_bytes, 25 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub directory: String,
    #[serde(default = "UploadConfig::default_public_path")]
    pub public_path: String,
    #[serde(default = "UploadConfig::default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl UploadConfig {
    fn default_public_path() -> String {
        "/uploads".to_string()
    }

    const fn default_max_file_bytes() -> usize {
        25 * 1024 * 1024
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: "uploads".to_string(),
            public_path: Self::default_public_path(),
            max_file_bytes: Self::default_max_file_bytes(),
        }
    }
}

/// Tuning for websocket fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Frames buffered per connection before new frames are dropped.
    #[serde(default = "RealtimeConfig::default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "RealtimeConfig::default_send_timeout")]
    pub send_timeout_ms: u64,
}

impl RealtimeConfig {
    const fn default_channel_capacity() -> usize {
        64
    }

    const fn default_send_timeout() -> u64 {
        5_000
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: Self::default_channel_capacity(),
            send_timeout_ms: Self::default_send_timeout(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use huddle_config::load;
///
/// std::env::remove_var("HUDDLE_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default(
            "database.acquire_timeout_seconds",
            i64::try_from(defaults.database.acquire_timeout_seconds).unwrap_or(i64::MAX),
        )?
        .set_default("uploads.directory", defaults.uploads.directory.clone())?
        .set_default("uploads.public_path", defaults.uploads.public_path.clone())?
        .set_default(
            "uploads.max_file_bytes",
            i64::try_from(defaults.uploads.max_file_bytes).unwrap_or(i64::MAX),
        )?
        .set_default(
            "realtime.channel_capacity",
            i64::try_from(defaults.realtime.channel_capacity).unwrap_or(i64::MAX),
        )?
        .set_default(
            "realtime.send_timeout_ms",
            i64::try_from(defaults.realtime.send_timeout_ms).unwrap_or(i64::MAX),
        )?;

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("HUDDLE_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via HUDDLE_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder
        .add_source(config::Environment::with_prefix("HUDDLE").separator("__"))
        .set_override_option("http.port", std::env::var(LEGACY_PORT_VAR).ok())?
        .set_override_option("database.url", std::env::var(LEGACY_DATABASE_URL_VAR).ok())?;

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    anyhow::ensure!(
        config.realtime.channel_capacity > 0,
        "invalid configuration: realtime.channel_capacity must be positive"
    );
    anyhow::ensure!(
        config.uploads.public_path.starts_with('/')
            && !config.uploads.public_path.trim_end_matches('/').is_empty(),
        "invalid configuration: uploads.public_path must be an absolute path other than /"
    );

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
