use anyhow::{Context, Result};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// DbConnection manages the device key-value table
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Connect with the given options and make sure the schema exists
    pub async fn new(
        options: SqliteConnectOptions,
        pool_options: SqlitePoolOptions,
    ) -> Result<Self> {
        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to key-value database")?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Open (creating if needed) a database file, along with its parent directory
    pub async fn open_file(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
                info!("Created data directory: {}", parent.display());
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        info!("Opening key-value database at {}", path.display());
        Self::new(options, SqlitePoolOptions::new()).await
    }

    /// Open a private in-memory database that lives as long as this connection
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Failed to build in-memory database options")?;

        // A single never-expiring connection keeps the in-memory database alive
        let pool_options = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);

        Self::new(options, pool_options).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_values (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create key_values table")?;

        Ok(())
    }

    /// Store a key-value pair.
    /// This will overwrite any existing value for the same key.
    pub async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO key_values (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Retrieve a value by its key
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM key_values WHERE key = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    /// Delete a value by its key
    pub async fn delete_value(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM key_values WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all keys, alphabetically
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM key_values ORDER BY key")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("key")).collect())
    }

    /// Close every pooled connection; later calls fail
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
