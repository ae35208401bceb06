use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates the pool for the hosted Postgres behind the backend-as-a-service.
///
/// Connections are opened on first use, so the API can come up (and serve
/// the LLM-only features) while the datastore is still unreachable.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Configuring PostgreSQL pool...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)?;

    info!("PostgreSQL pool configured (connections open lazily)");
    Ok(pool)
}
