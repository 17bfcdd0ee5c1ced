//! Best-effort persistence of command results.

use std::time::Duration;

use log::{debug, error, info};
use sqlx::AnyPool;

use crate::config::{Config, DB_ACQUIRE_TIMEOUT_SECS};
use crate::error_handling::DatabaseError;
use crate::models::CommandResult;

use super::pool::{init_db_pool, Backend};

#[derive(Clone)]
struct Backing {
    pool: AnyPool,
    backend: Backend,
}

/// Handle used by the probe endpoints to record results.
///
/// A disabled store accepts every save and does nothing. An enabled store
/// writes one row per save; failures are logged and never returned to the
/// caller, so the diagnostic endpoints keep working while the database is
/// down. Cloning is cheap and shares the underlying pool.
#[derive(Clone, Default)]
pub struct ResultStore {
    backing: Option<Backing>,
}

impl ResultStore {
    /// A store that never writes.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Connects a store to `url` without contacting the database.
    pub fn connect(url: &str, acquire_timeout: Duration) -> Result<Self, DatabaseError> {
        let backend = Backend::from_url(url)?;
        let pool = init_db_pool(url, acquire_timeout)?;
        Ok(ResultStore {
            backing: Some(Backing { pool, backend }),
        })
    }

    /// Builds the store described by `config` and prepares the schema.
    ///
    /// Returns a disabled store when saving is off, or when it is on but the
    /// connection string is missing or unusable. If the table cannot be
    /// created right now, the error is logged and the store stays enabled so
    /// writes resume once the database is reachable.
    pub async fn from_config(config: &Config) -> Self {
        if !config.save_to_db {
            info!("Result persistence disabled");
            return Self::disabled();
        }

        let store = match config.database_url.as_deref() {
            Some(url) => Self::connect(url, Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS)),
            None => Err(DatabaseError::MissingUrl),
        };

        match store {
            Ok(store) => {
                if let Err(e) = store.ensure_schema().await {
                    error!("Error setting up database: {e}");
                }
                info!("Result persistence enabled");
                store
            }
            Err(e) => {
                error!("Error setting up database: {e}; results will not be saved");
                Self::disabled()
            }
        }
    }

    /// Whether saves reach a database.
    pub fn is_enabled(&self) -> bool {
        self.backing.is_some()
    }

    /// Creates the results table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let Some(backing) = &self.backing else {
            return Ok(());
        };
        sqlx::query(backing.backend.create_table_sql())
            .execute(&backing.pool)
            .await?;
        Ok(())
    }

    /// Inserts one result, reporting any failure.
    ///
    /// The connection is held only for the duration of the insert and goes
    /// back to the pool on every path. `created_at` is filled in by the
    /// column default.
    pub async fn try_save(&self, result: &CommandResult) -> Result<(), DatabaseError> {
        let Some(backing) = &self.backing else {
            return Ok(());
        };

        let mut conn = backing.pool.acquire().await?;
        sqlx::query("INSERT INTO command_results (command, target, output) VALUES ($1, $2, $3)")
            .bind(result.command.to_string())
            .bind(&result.target)
            .bind(&result.output)
            .execute(&mut *conn)
            .await?;

        debug!("Saved {} result for {}", result.command, result.target);
        Ok(())
    }

    /// Saves `result` if persistence is enabled, swallowing any failure.
    pub async fn save(&self, result: &CommandResult) {
        if !self.is_enabled() {
            return;
        }
        if let Err(e) = self.try_save(result).await {
            error!("Failed to save {} result: {e}", result.command);
        }
    }

    /// Saves `result` on a detached task so the caller never waits on the database.
    pub fn save_in_background(&self, result: CommandResult) {
        if !self.is_enabled() {
            return;
        }
        let store = self.clone();
        let handle = tokio::spawn(async move { store.save(&result).await });
        drop(handle);
    }

    /// Closes the pool, waiting for in-flight writes to finish.
    pub async fn close(&self) {
        if let Some(backing) = &self.backing {
            backing.pool.close().await;
            info!("Result store closed");
        }
    }
}
