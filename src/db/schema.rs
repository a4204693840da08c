use sqlx::PgPool;
use tracing::{info, warn};

/// Applies the migrations, then tries to turn crypto_prices into a TimescaleDB
/// hypertable. Without the extension the table stays a plain PostgreSQL table.
pub async fn prepare(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("✓ Database schema is up to date");

    match sqlx::query("SELECT create_hypertable('crypto_prices', 'date', if_not_exists => TRUE)")
        .execute(pool)
        .await
    {
        Ok(_) => info!("✓ crypto_prices is a TimescaleDB hypertable"),
        Err(e) => warn!(
            "TimescaleDB extension not available, running as regular PostgreSQL table: {}",
            e
        ),
    }

    Ok(())
}
