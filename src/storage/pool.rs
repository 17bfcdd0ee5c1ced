//! Database connection pool management.
//!
//! The pool is created lazily: no connection is attempted until the first
//! query, so an unreachable database never delays startup or a probe.

use std::time::Duration;

use log::info;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

use crate::config::DB_MAX_CONNECTIONS;
use crate::error_handling::DatabaseError;

/// SQL dialects the result store can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `postgres://` or `postgresql://`
    Postgres,
    /// `sqlite:`
    Sqlite,
}

impl Backend {
    /// Picks the dialect from the connection string's scheme.
    pub fn from_url(url: &str) -> Result<Self, DatabaseError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(DatabaseError::UnsupportedScheme(other.to_string())),
        }
    }

    /// DDL creating the results table if it is missing.
    pub fn create_table_sql(&self) -> &'static str {
        match self {
            Backend::Postgres => {
                "CREATE TABLE IF NOT EXISTS command_results (
                    id SERIAL PRIMARY KEY,
                    command TEXT NOT NULL,
                    target TEXT NOT NULL,
                    output TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )"
            }
            Backend::Sqlite => {
                "CREATE TABLE IF NOT EXISTS command_results (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    command TEXT NOT NULL,
                    target TEXT NOT NULL,
                    output TEXT NOT NULL,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )"
            }
        }
    }
}

/// Builds a lazily connecting pool for `url`.
///
/// `acquire_timeout` bounds how long any single write waits for a connection,
/// including connecting to a database that is down.
pub fn init_db_pool(url: &str, acquire_timeout: Duration) -> Result<AnyPool, DatabaseError> {
    install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(url)
        .map_err(DatabaseError::SqlError)?;

    info!("Database pool configured (max {DB_MAX_CONNECTIONS} connections)");
    Ok(pool)
}
