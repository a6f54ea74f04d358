//! Database connection and operations

pub mod movies;
pub mod people;
pub mod schema_sync;
pub mod store;

use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub use movies::{
    CreateMovie, CreateTitle, MovieAggregate, MovieRecord, MovieRepository, TitleRecord,
    UpdateMovie,
};
pub use people::{PeopleRepository, PersonKind, PersonRecord};
pub use store::{MovieStore, MovieUnitOfWork, SqliteUnitOfWork};

/// Pause between attempts in [Database::connect_with_retry]
const RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// How long a connection waits on another connection's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    fn connect_options(url: &str) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        Ok(options)
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(Self::connect_options(url)?)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Ok(Self { pool })
    }

    /// Create a new database connection pool, retrying every few seconds
    /// until `timeout` has elapsed
    pub async fn connect_with_retry(
        url: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let deadline = Instant::now() + timeout;
        loop {
            match Self::connect(url, max_connections).await {
                Ok(db) => return Ok(db),
                Err(e) if Instant::now() + RETRY_INTERVAL < deadline => {
                    tracing::warn!(
                        error = %e,
                        retry_in_secs = RETRY_INTERVAL.as_secs(),
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(RETRY_INTERVAL).await;
                }
                Err(e) => return Err(e.context("Giving up on database connection")),
            }
        }
    }

    /// Private in-memory database with the schema already in place.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(Self::connect_options("sqlite::memory:")?)
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        let result = schema_sync::sync_schema(db.pool()).await;
        if let Some(err) = result.errors.first() {
            anyhow::bail!("Schema sync failed: {}", err);
        }
        Ok(db)
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a write transaction on a pooled connection.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so concurrent units of
    /// work queue on `busy_timeout` instead of failing with `SQLITE_BUSY` when
    /// a read is later upgraded to a write.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .context("Failed to begin write transaction")?;
        Ok(tx)
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get a movies repository
    pub fn movies(&self) -> MovieRepository {
        MovieRepository::new(self.pool.clone())
    }

    /// Get a people repository for one kind of person
    pub fn people(&self, kind: PersonKind) -> PeopleRepository {
        PeopleRepository::new(self.pool.clone(), kind)
    }

    /// Get a directors repository
    pub fn directors(&self) -> PeopleRepository {
        self.people(PersonKind::Director)
    }

    /// Get a musicians repository
    pub fn musicians(&self) -> PeopleRepository {
        self.people(PersonKind::Musician)
    }

    /// Get a writers repository
    pub fn writers(&self) -> PeopleRepository {
        self.people(PersonKind::Writer)
    }
}
