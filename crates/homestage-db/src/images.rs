//! Image reference repository implementation.
//!
//! The three image collections share one row shape and differ only in the
//! backing table, selected through [`ImageVariant::table`]. Table names are
//! static strings, never interpolated from input.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use homestage_core::{
    Error, ImageReference, ImageVariant, PropertyImageRepository, Result,
};

/// Append one image reference within an existing transaction.
pub async fn insert_image_tx(
    tx: &mut Transaction<'_, Postgres>,
    variant: ImageVariant,
    property_id: i64,
    url: &str,
) -> Result<i64> {
    let sql = format!(
        "INSERT INTO {} (property_id, url) VALUES ($1, $2) RETURNING id",
        variant.table()
    );
    let id: i64 = sqlx::query_scalar(&sql)
        .bind(property_id)
        .bind(url)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

    debug!(
        subsystem = "db",
        component = "images",
        op = "insert",
        property_id = property_id,
        variant = %variant,
        "Inserted image reference"
    );
    Ok(id)
}

/// PostgreSQL implementation of PropertyImageRepository.
pub struct PgPropertyImageRepository {
    pool: PgPool,
}

impl PgPropertyImageRepository {
    /// Create a new PgPropertyImageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyImageRepository for PgPropertyImageRepository {
    async fn insert(&self, variant: ImageVariant, property_id: i64, url: &str) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let id = insert_image_tx(&mut tx, variant, property_id, url).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(id)
    }

    async fn list(&self, variant: ImageVariant, property_id: i64) -> Result<Vec<ImageReference>> {
        let sql = format!(
            "SELECT id, property_id, url, created_at_utc FROM {} \
             WHERE property_id = $1 ORDER BY created_at_utc, id",
            variant.table()
        );
        sqlx::query_as(&sql)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
