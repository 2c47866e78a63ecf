//! database (db) connection, created once at startup.
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Custom db structure shared with the user store.
#[derive(Clone)]
pub struct Database {
    pub postgres: PgPool,
}

impl Database {
    /// Init database connections.
    pub async fn new(url: &str, pool: u32) -> Result<Self, sqlx::Error> {
        let postgres =
            PgPoolOptions::new().max_connections(pool).connect(url).await?;

        tracing::info!(pool_size = pool, "postgres connected");

        Ok(Self { postgres })
    }

    /// Execute migrations scripts.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.postgres).await
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.postgres.close().await;
        tracing::info!("postgres connections closed");
    }
}
