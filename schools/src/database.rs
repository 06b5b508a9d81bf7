//! SQLite storage handle and schema.
//!
//! [`Database`] owns the connection pool. It is opened once at startup,
//! handed to [`crate::SchoolRepository`], and closed explicitly at shutdown.
//!
//! ```ignore
//! use schools::{Database, DatabaseConfig, SchoolRepository};
//!
//! let database = Database::connect(&DatabaseConfig::from_env()?).await?;
//! let repository = SchoolRepository::new(database.clone());
//! // ...
//! database.close().await;
//! ```

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{Result, SchoolError};

/// Default database URL when `SCHOOLS_DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://schools.db";

/// Default pool size when `SCHOOLS_MAX_CONNECTIONS` is not set.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const SQL_CREATE_SCHOOLS: &str = r#"
CREATE TABLE IF NOT EXISTS schools (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  address TEXT NOT NULL,
  latitude REAL NOT NULL,
  longitude REAL NOT NULL,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
)
"#;

const SQL_CREATE_COORDINATE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_coordinates ON schools (latitude, longitude)
"#;

/// Connection settings for [`Database`].
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., `sqlite://schools.db` or `sqlite::memory:`).
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create a config for the given URL with the default pool size.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// A private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    /// Set the maximum pool size.
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Create a config from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SCHOOLS_DATABASE_URL` | SQLite connection URL | `sqlite://schools.db` |
    /// | `SCHOOLS_MAX_CONNECTIONS` | Maximum pooled connections | 5 |
    ///
    /// # Errors
    ///
    /// Returns [`SchoolError::Config`] if `SCHOOLS_MAX_CONNECTIONS` is set but
    /// is not a positive integer.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SCHOOLS_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match std::env::var("SCHOOLS_MAX_CONNECTIONS") {
            Ok(raw) => parse_max_connections(&raw)?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self::new(url).max_connections(max_connections))
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

fn parse_max_connections(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SchoolError::Config(format!(
            "SCHOOLS_MAX_CONNECTIONS must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// Handle to the schools database.
///
/// Cloning is cheap; all clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool and make sure the schema exists.
    ///
    /// File databases are created if missing. An in-memory database lives
    /// only as long as its connection, so it is pinned to a single
    /// connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?
        };

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connected to database"
        );

        let database = Self { pool };
        database.create_tables().await?;
        Ok(database)
    }

    /// Create the `schools` table and its coordinate index if missing.
    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(SQL_CREATE_SCHOOLS).execute(&self.pool).await?;
        sqlx::query(SQL_CREATE_COORDINATE_INDEX)
            .execute(&self.pool)
            .await?;
        tracing::debug!("Schools table created/verified");
        Ok(())
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection. Later queries fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_builder() {
        let config = DatabaseConfig::new("sqlite://test.db").max_connections(2);
        assert_eq!(config.url, "sqlite://test.db");
        assert_eq!(config.max_connections, 2);
        assert!(!config.is_in_memory());
        assert!(DatabaseConfig::in_memory().is_in_memory());
        assert_eq!(DatabaseConfig::default().url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_parse_max_connections() {
        assert_eq!(parse_max_connections("8").unwrap(), 8);
        assert!(matches!(
            parse_max_connections("0"),
            Err(SchoolError::Config(_))
        ));
        assert!(parse_max_connections("many").is_err());
    }

    #[tokio::test]
    async fn test_connect_in_memory_creates_schema() {
        let database = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_coordinates'",
        )
        .fetch_one(database.pool())
        .await
        .unwrap();
        assert_eq!(count, 1);

        // Idempotent
        database.create_tables().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schools.db");
        let url = format!("sqlite://{}", path.display());

        let database = Database::connect(&DatabaseConfig::new(url)).await.unwrap();
        assert!(path.exists());

        database.close().await;
        assert!(database.is_closed());
    }
}
