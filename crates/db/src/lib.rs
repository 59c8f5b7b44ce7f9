//! PostgreSQL persistence for users and fraud events.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use store::PgUserStore;

pub type DbPool = sqlx::PgPool;

/// Upper bound on pooled connections.
const MAX_CONNECTIONS: u32 = 25;

/// Connections kept open while idle.
const MIN_CONNECTIONS: u32 = 5;

/// Connections are recycled after this long.
const CONNECTION_MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_CONNECTIONS)
        .max_lifetime(CONNECTION_MAX_LIFETIME)
        .connect(database_url)
        .await
}

/// Create a pool, retrying while the database is still starting up.
///
/// Returns the last connection error once `attempts` are exhausted.
pub async fn connect_with_retry(
    database_url: &str,
    attempts: u32,
    delay: Duration,
) -> Result<DbPool, sqlx::Error> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match create_pool(database_url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, max = attempts, error = %e, "Waiting for database");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Verify the pool can execute a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
