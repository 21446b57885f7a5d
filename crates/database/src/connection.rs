use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is sized from the loaded settings and shared across the entire
/// application; every store call checks a connection out of it.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&settings.url)
        .await
        .map_err(DbError::ConnectionError)?;

    tracing::info!(
        max_connections = settings.max_connections,
        "Connected to the database."
    );

    Ok(pool)
}
