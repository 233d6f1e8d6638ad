//! # Pizza Store Handle
//!
//! Opens the SQLite file that holds the customization catalog, product
//! pizza configs and the saved customizations of order items.
//!
//! ## Who Opens It
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  seed binary        --db <PATH>  ─┐                                     │
//! │  order screen       PIZZA_DB_PATH ├──► DbConfig ──► Database::new()     │
//! │  tests              in_memory()  ─┘                    │                │
//! │                                                        ▼                │
//! │                        ┌──────────────────────────────────────────┐     │
//! │                        │ one pool, many short-lived handles       │     │
//! │                        │  customizations()  read: pick lists      │     │
//! │                        │  pizza_configs()   read/write: pricing   │     │
//! │                        │  order_items()     write: accepted lines │     │
//! │                        │  submissions()     review + persist      │     │
//! │                        └──────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The screen keeps loading the catalog while a submission rewrites an item's
//! records. WAL lets those reads proceed; writers that collide wait up to
//! `busy_timeout` instead of failing with `SQLITE_BUSY`.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::customization::CustomizationRepository;
use crate::repository::order_item::OrderItemCustomizationRepository;
use crate::repository::pizza_config::PizzaConfigRepository;
use crate::submission::SubmissionService;

/// Environment variable naming the pizza store file.
pub const DB_PATH_ENV: &str = "PIZZA_DB_PATH";

/// Store file used when neither a flag nor the environment names one.
pub const DEFAULT_DB_PATH: &str = "./pizza_dev.db";

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the pizza store lives and how the pool around it behaves.
///
/// Path precedence: explicit path ([`DbConfig::resolve`]) > `PIZZA_DB_PATH` >
/// `./pizza_dev.db`.
///
/// ```rust,ignore
/// let config = DbConfig::resolve(cli_path.as_deref()).max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    /// Default 4: the order screen, a submission and a seed run at most.
    pub max_connections: u32,
    /// How long to wait for a free pooled connection.
    pub acquire_timeout: Duration,
    /// How long a write waits on a locked store.
    pub busy_timeout: Duration,
    /// Apply pending schema migrations while connecting.
    pub migrate_on_connect: bool,
}

impl DbConfig {
    /// Store at `path`; the file is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            migrate_on_connect: true,
        }
    }

    /// Store named by `PIZZA_DB_PATH`, else `./pizza_dev.db`.
    pub fn from_env() -> Self {
        Self::resolve(None)
    }

    /// Store named by an explicit path (a `--db` flag), then the environment.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let path = match explicit {
            Some(path) => path.to_string(),
            None => std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
        };
        DbConfig::new(path)
    }

    /// Private store for one test. A single connection, since every new
    /// `:memory:` connection would see an empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(2),
            ..DbConfig::new(IN_MEMORY)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn migrate_on_connect(mut self, migrate: bool) -> Self {
        self.migrate_on_connect = migrate;
        self
    }

    #[inline]
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle over the pizza store; repositories share its pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects, enforcing foreign keys so an order item can never point at
    /// a customization that does not exist, then migrates when configured.
    ///
    /// ## Errors
    /// - `DbError::ConnectionFailed` for a bad path or an unreachable file
    /// - `DbError::MigrationFailed` when the embedded schema cannot be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            in_memory = config.is_in_memory(),
            "Opening pizza store"
        );

        let options = SqliteConnectOptions::from_str(&format!(
            "sqlite://{}?mode=rwc",
            config.database_path.display()
        ))
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout)
        .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pizza store pool ready");

        let db = Database { pool };
        if config.migrate_on_connect {
            migrations::run_migrations(&db.pool).await?;
        }

        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Catalog rows: pick lists, search, and id resolution for saved lines.
    pub fn customizations(&self) -> CustomizationRepository {
        CustomizationRepository::new(self.pool.clone())
    }

    pub fn pizza_configs(&self) -> PizzaConfigRepository {
        PizzaConfigRepository::new(self.pool.clone())
    }

    pub fn order_items(&self) -> OrderItemCustomizationRepository {
        OrderItemCustomizationRepository::new(self.pool.clone())
    }

    /// Review-then-persist flow over the three repositories.
    pub fn submissions(&self) -> SubmissionService {
        SubmissionService::new(self)
    }

    pub async fn close(&self) {
        info!("Closing pizza store");
        self.pool.close().await;
    }

    /// True while the store answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(db.customizations().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_store_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_store_without_migrations_has_no_tables() {
        let config = DbConfig::in_memory().migrate_on_connect(false);
        let db = Database::new(config).await.unwrap();

        assert!(db.customizations().count().await.is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = DbConfig::resolve(Some("/tmp/pizza-test.db"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/pizza-test.db"));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/pizza-test.db")
            .max_connections(2)
            .busy_timeout(Duration::from_secs(1))
            .migrate_on_connect(false);

        assert_eq!(config.max_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert!(!config.migrate_on_connect);
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
