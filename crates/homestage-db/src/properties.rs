//! Property repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use homestage_core::{
    Error, ImageVariant, IngestSink, NewProperty, PropertyFull, PropertyRecord,
    PropertyRepository, PropertySummary, Result, SearchStore,
};

use crate::escape_like;
use crate::images::insert_image_tx;

/// Column list shared by every summary-shaped query.
const SUMMARY_COLUMNS: &str =
    "id, street, city, state, agent_name, agent_phone, contacted, created_at_utc, updated_at_utc";

/// PostgreSQL implementation of PropertyRepository.
pub struct PgPropertyRepository {
    pool: PgPool,
}

impl PgPropertyRepository {
    /// Create a new PgPropertyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a property within an existing transaction.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: NewProperty,
    ) -> Result<i64> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO property (
                street, city, state, zipcode,
                building_id, listing_status, price, days_on_market,
                agent_name, agent_business_name, agent_phone,
                agent_badge_type, agent_photo_url, agent_profile_url,
                contacted, created_at_utc, updated_at_utc
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, FALSE, $15, $15)
             RETURNING id",
        )
        .bind(&draft.street)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.zipcode)
        .bind(&draft.building_id)
        .bind(&draft.listing_status)
        .bind(&draft.price)
        .bind(draft.days_on_market)
        .bind(&draft.agent_name)
        .bind(&draft.agent_business_name)
        .bind(&draft.agent_phone)
        .bind(&draft.agent_badge_type)
        .bind(&draft.agent_photo_url)
        .bind(&draft.agent_profile_url)
        .bind(now)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "properties",
            op = "insert",
            property_id = id,
            "Inserted property"
        );
        Ok(id)
    }

    /// Check if a property exists within an existing transaction.
    pub async fn exists_tx(&self, tx: &mut Transaction<'_, Postgres>, id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM property WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut **tx)
                .await
                .map_err(Error::Database)?;
        Ok(exists)
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn insert(&self, draft: NewProperty) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let id = self.insert_tx(&mut tx, draft).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> Result<PropertyFull> {
        let property = sqlx::query_as::<_, PropertyRecord>(
            "SELECT id, street, city, state, zipcode,
                    building_id, listing_status, price, days_on_market,
                    agent_name, agent_business_name, agent_phone,
                    agent_badge_type, agent_photo_url, agent_profile_url,
                    contacted, notes, created_at_utc, updated_at_utc
             FROM property WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::PropertyNotFound(id))?;

        let mut collections = Vec::with_capacity(3);
        for variant in [
            ImageVariant::Other,
            ImageVariant::Unstaged,
            ImageVariant::Generated,
        ] {
            let sql = format!(
                "SELECT id, property_id, url, created_at_utc FROM {} \
                 WHERE property_id = $1 ORDER BY created_at_utc, id",
                variant.table()
            );
            let images = sqlx::query_as(&sql)
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;
            collections.push(images);
        }
        let generated_images = collections.pop().unwrap_or_default();
        let unstaged_images = collections.pop().unwrap_or_default();
        let other_images = collections.pop().unwrap_or_default();

        Ok(PropertyFull {
            property,
            other_images,
            unstaged_images,
            generated_images,
        })
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PropertySummary>> {
        let sql = format!(
            "SELECT {} FROM property ORDER BY updated_at_utc DESC LIMIT $1 OFFSET $2",
            SUMMARY_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn set_contacted(&self, id: i64, contacted: bool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE property SET contacted = $1, updated_at_utc = $2 WHERE id = $3",
        )
        .bind(contacted)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PropertyNotFound(id));
        }
        Ok(())
    }

    async fn update_notes(&self, id: i64, notes: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE property SET notes = $1, updated_at_utc = $2 WHERE id = $3")
                .bind(notes)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PropertyNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // All three image collections go first; the property owns them and a
        // partial delete must never be observable.
        for variant in [
            ImageVariant::Other,
            ImageVariant::Unstaged,
            ImageVariant::Generated,
        ] {
            let sql = format!("DELETE FROM {} WHERE property_id = $1", variant.table());
            sqlx::query(&sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        let result = sqlx::query("DELETE FROM property WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PropertyNotFound(id));
        }

        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "db",
            component = "properties",
            op = "delete",
            property_id = id,
            "Deleted property and image references"
        );
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM property WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(exists)
    }
}

#[async_trait]
impl IngestSink for PgPropertyRepository {
    async fn persist_listing(
        &self,
        draft: NewProperty,
        other_urls: &[String],
        unstaged_urls: &[String],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let id = self.insert_tx(&mut tx, draft).await?;

        for url in other_urls {
            insert_image_tx(&mut tx, ImageVariant::Other, id, url).await?;
        }
        for url in unstaged_urls {
            insert_image_tx(&mut tx, ImageVariant::Unstaged, id, url).await?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(id)
    }
}

#[async_trait]
impl SearchStore for PgPropertyRepository {
    async fn find_summary_by_id(&self, id: i64) -> Result<Option<PropertySummary>> {
        let sql = format!("SELECT {} FROM property WHERE id = $1", SUMMARY_COLUMNS);
        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn search_exact(&self, term: &str, limit: i64) -> Result<Vec<PropertySummary>> {
        let sql = format!(
            "SELECT {} FROM property
             WHERE LOWER(street) = LOWER($1)
                OR LOWER(agent_name) = LOWER($1)
                OR LOWER(agent_phone) = LOWER($1)
             ORDER BY updated_at_utc DESC
             LIMIT $2",
            SUMMARY_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(term)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn search_fuzzy(&self, term: &str, limit: i64) -> Result<Vec<PropertySummary>> {
        let pattern = format!("%{}%", escape_like(term));
        let sql = format!(
            r#"SELECT {} FROM property
             WHERE street ILIKE $1 ESCAPE '\'
                OR agent_name ILIKE $1 ESCAPE '\'
                OR agent_phone ILIKE $1 ESCAPE '\'
             ORDER BY updated_at_utc DESC
             LIMIT $2"#,
            SUMMARY_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
