//! Database connection management
//!
//! One [`Database`] is built at process start and cloned into every
//! repository. The underlying `PgPool` is created lazily on the first
//! [`Database::acquire`] and reused afterwards.
//!
//! Every repository call works inside its own [`ScopedSession`] (a
//! transaction). Committing is explicit via [`ScopedSession::close`]; a
//! session dropped on an error path rolls back and hands its connection
//! back to the pool.

use std::str::FromStr;
use std::sync::Arc;

use socialctl_core::{DatabaseConfig, Result, SocialError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::SqlxResultExt;

/// Access mode requested for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// Shared, lazily connected PostgreSQL handle
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    config: DatabaseConfig,
    pool: OnceCell<PgPool>,
}

impl Database {
    /// Build a handle; no connection is made until the first session.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            inner: Arc::new(DatabaseInner {
                config,
                pool: OnceCell::new(),
            }),
        }
    }

    /// Wrap an already connected pool (used by integration tests).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            inner: Arc::new(DatabaseInner {
                config: DatabaseConfig::default(),
                pool: OnceCell::new_with(Some(pool)),
            }),
        }
    }

    /// Whether the pool has been created yet.
    pub fn is_connected(&self) -> bool {
        self.inner.pool.initialized()
    }

    /// Get the pool, connecting on first use.
    pub async fn pool(&self) -> Result<&PgPool> {
        self.inner
            .pool
            .get_or_try_init(|| create_pool(&self.inner.config))
            .await
    }

    /// Open a session in the requested mode.
    pub async fn acquire(&self, mode: AccessMode) -> Result<ScopedSession> {
        let pool = self.pool().await?;
        let mut tx = pool.begin().await.ctx("opening session")?;

        if mode == AccessMode::Read {
            sqlx::query("SET TRANSACTION READ ONLY")
                .execute(&mut *tx)
                .await
                .ctx("marking session read-only")?;
        }

        Ok(ScopedSession { tx, mode })
    }

    /// Close the pool. Safe to call when no connection was ever made.
    pub async fn teardown(&self) {
        if let Some(pool) = self.inner.pool.get() {
            pool.close().await;
            info!("database pool closed");
        }
    }
}

/// Create the connection pool described by `config`.
///
/// `username`/`password` override whatever the URL carries.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let mut options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| SocialError::config(format!("invalid database url: {}", e)))?;
    if let Some(user) = &config.username {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }

    debug!(
        host = options.get_host(),
        port = options.get_port(),
        max_connections = config.max_connections,
        "connecting to postgres"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .ctx("connecting to database")?;

    info!("database pool ready");
    Ok(pool)
}

/// Short-lived, mode-bound handle to the database.
pub struct ScopedSession {
    tx: Transaction<'static, Postgres>,
    mode: AccessMode,
}

impl ScopedSession {
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Connection to run queries against.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut *self.tx
    }

    /// Commit and release the session.
    pub async fn close(self) -> Result<()> {
        self.tx.commit().await.ctx("closing session")
    }
}
