// MySQL connection pool implementation

use crate::config::DatabaseConfig;
use crate::errors::DatabaseError;
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::Transaction;
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper
///
/// Bounded to `max_connections`; callers beyond the bound queue (without limit)
/// until a connection frees up or `connect_timeout_seconds` elapses. Connections
/// go back to the pool when the returned guard is dropped, on every path.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: MySqlPool,
}

impl DbPool {
    /// Create a new database connection pool
    ///
    /// # Errors
    /// Returns `DatabaseError::ConnectionFailed` if unable to establish connection
    #[instrument(
        skip(config),
        fields(max_connections = config.max_connections, host = %config.host)
    )]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing database connection pool");

        let pool = Self::pool_options(config)
            .connect_with(Self::connect_options(config))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                DatabaseError::ConnectionFailed(e.to_string())
            })?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database connection pool initialized successfully"
        );

        Ok(Self { pool })
    }

    /// Create a pool that opens connections on first use
    pub fn new_lazy(config: &DatabaseConfig) -> Self {
        let pool = Self::pool_options(config).connect_lazy_with(Self::connect_options(config));
        Self { pool }
    }

    fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
    }

    fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .after_connect(|_conn, meta| {
                Box::pin(async move {
                    info!(age = ?meta.age, "New MySQL connection established");
                    Ok(())
                })
            })
    }

    /// Get a reference to the underlying pool
    ///
    /// This is used by repositories to execute queries
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Check out a dedicated connection
    ///
    /// # Errors
    /// `DatabaseError::ConnectionTimeout` when no connection frees up in time
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>, DatabaseError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "MySQL pool error while acquiring connection");
            DatabaseError::from(e)
        })
    }

    /// Check out a dedicated connection and start a transaction on it
    ///
    /// Dropping the transaction without committing rolls it back and
    /// returns the connection to the pool.
    #[instrument(skip(self))]
    pub async fn begin(&self) -> Result<Transaction<'static, MySql>, DatabaseError> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "MySQL pool error while starting transaction");
            match DatabaseError::from(e) {
                DatabaseError::QueryFailed(msg) => DatabaseError::TransactionFailed(msg),
                other => other,
            }
        })
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                DatabaseError::HealthCheckFailed(e.to_string())
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Apply the embedded schema migrations
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        info!("Database migrations applied");
        Ok(())
    }

    /// Get the current number of connections in the pool
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Get the number of idle connections in the pool
    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Close the connection pool gracefully
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
