//! # homestage-db
//!
//! PostgreSQL database layer for homestage.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for property records and image references
//! - The two search read queries (exact equality and ILIKE substring)
//! - Transactional cascade delete preserving the image-ownership invariant
//!
//! ## Example
//!
//! ```rust,ignore
//! use homestage_db::Database;
//! use homestage_core::{NewProperty, PropertyRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/homestage").await?;
//!
//!     let id = db.properties.insert(NewProperty {
//!         street: Some("123 Main St".to_string()),
//!         ..Default::default()
//!     }).await?;
//!
//!     println!("Created property: {}", id);
//!     Ok(())
//! }
//! ```

pub mod images;
pub mod pool;
pub mod properties;

// Test fixtures for integration tests.
// Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL.
pub mod test_fixtures;

// Re-export core types
pub use homestage_core::*;

// Re-export repository implementations
pub use images::{insert_image_tx, PgPropertyImageRepository};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use properties::PgPropertyRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::PgPool,
    /// Property repository for CRUD, ingestion writes, and search reads.
    pub properties: PgPropertyRepository,
    /// Image reference repository for the three child collections.
    pub images: PgPropertyImageRepository,
}

impl Database {
    /// Connect with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Build the repository set around an existing pool.
    pub fn from_pool(pool: sqlx::PgPool) -> Self {
        Self {
            properties: PgPropertyRepository::new(pool.clone()),
            images: PgPropertyImageRepository::new(pool.clone()),
            pool,
        }
    }
}
