use std::time::Duration;

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

use crate::config::{PostgresConfig, SslMode};

/// Owned handle to the Postgres pool. Built once at startup, handed to the
/// stores, and closed explicitly on shutdown.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &PostgresConfig) -> Result<Self, sqlx::Error> {
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Builds the pool without opening a connection. Used by tests that only
    /// exercise paths which never reach the database.
    pub fn connect_lazy(config: &PostgresConfig) -> Result<Self, sqlx::Error> {
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(options);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(config: &PostgresConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let mut options: PgConnectOptions = config.connection_string.parse()?;
    options = options.application_name(&config.application_name);

    let ssl_mode = match config.ssl_mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
    };
    options = options.ssl_mode(ssl_mode);

    if config.statement_timeout_ms > 0 {
        let timeout = config.statement_timeout_ms.to_string();
        options = options.options([("statement_timeout", timeout.as_str())]);
    }

    Ok(options)
}
