use std::time::Duration;

use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait,
};

use crate::config::DatabaseConfig;
use crate::errors::AppError;

/// Build ConnectOptions from the database settings, falling back to the pool defaults.
fn connect_options(settings: &DatabaseConfig, url: String) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(20)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    let pool = &settings.pool;
    if let Some(v) = pool.max_connections {
        opt.max_connections(v);
    }
    if let Some(v) = pool.min_connections {
        opt.min_connections(v);
    }
    if let Some(v) = pool.connect_timeout_secs {
        opt.connect_timeout(Duration::from_secs(v));
    }
    if let Some(v) = pool.acquire_timeout_secs {
        opt.acquire_timeout(Duration::from_secs(v));
    }
    if let Some(v) = pool.idle_timeout_secs {
        opt.idle_timeout(Duration::from_secs(v));
    }
    if let Some(v) = pool.sql_log {
        opt.sqlx_logging(v);
    }

    opt
}

/// Owns the connection pool and hands out request-scoped sessions.
///
/// Cloning is cheap; every clone shares the same pool.
#[derive(Clone, Debug)]
pub struct ConnectionManager {
    conn: DatabaseConnection,
}

impl ConnectionManager {
    /// Connects to MySQL and verifies the server answers.
    pub async fn connect(settings: &DatabaseConfig) -> Result<Self, AppError> {
        let url = settings.url().map_err(|e| AppError::Connectivity(e.to_string()))?;
        let conn = Database::connect(connect_options(settings, url))
            .await
            .map_err(|e| {
                AppError::Connectivity(format!(
                    "Failed to connect to database at {}: {}",
                    settings.redacted_url(),
                    e
                ))
            })?;

        let manager = Self { conn };
        manager.ping().await.map_err(|e| {
            AppError::Connectivity(format!(
                "Failed to ping database at {}: {}",
                settings.redacted_url(),
                e
            ))
        })?;

        log::info!("Connected to database at {}", settings.redacted_url());
        Ok(manager)
    }

    /// Wraps an already established pool (tests use an in-memory SQLite one).
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Checks out a connection and begins a transaction on it.
    pub async fn open_session(&self) -> Result<Session, AppError> {
        let txn = self.conn.begin().await?;
        Ok(Session { txn })
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.conn.ping().await.map_err(AppError::from)
    }

    pub async fn close(self) -> Result<(), AppError> {
        self.conn.close().await.map_err(AppError::from)
    }
}

/// A transaction bound to one operation.
///
/// `commit` consumes the session. A session dropped without commit (early return,
/// error, cancelled request) is rolled back and its connection returned to the pool.
pub struct Session {
    txn: DatabaseTransaction,
}

impl Session {
    pub fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.txn.commit().await.map_err(AppError::from)
    }

    pub async fn rollback(self) -> Result<(), AppError> {
        self.txn.rollback().await.map_err(AppError::from)
    }
}
