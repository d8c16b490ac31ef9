use crate::config::get_config;
use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Pool sized from config. Course pages fan out into several short reads
/// per request, so the acquire timeout is kept tight rather than letting
/// requests queue behind a saturated pool.
pub async fn create_pool() -> Result<PgPool> {
    let config = get_config();
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}
