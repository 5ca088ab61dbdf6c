use anyhow::{Context, Result};
use huddle_config::AppConfig;
use huddle_database::{initialize_database, DatabaseError};
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Installs the global fmt subscriber. `RUST_LOG` wins over the `info` default.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .map_err(|error| match error {
                DatabaseError::MigrationError(_) => {
                    anyhow::Error::new(error).context("database migrations failed")
                }
                other => anyhow::Error::new(other).context("failed to connect to database"),
            })?;

        let (chats,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chats")
            .fetch_one(&db_pool)
            .await
            .context("failed to inspect chat store")?;

        info!(url = %config.database.url, chats, "chat store ready");

        Ok(Self { db_pool })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
