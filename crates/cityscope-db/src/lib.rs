//! # cityscope-db
//!
//! PostgreSQL storage layer for cityscope.
//!
//! This crate provides:
//! - Connection pool management
//! - The location repository (resolve-or-insert with a unique search key)
//! - The generation store (atomic per-category replace with a fetch marker)
//!
//! ## Example
//!
//! ```rust,ignore
//! use cityscope_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/cityscope").await?;
//!     let hit = db.locations.find_by_query("98105").await?;
//!     println!("cached: {:?}", hit);
//!     Ok(())
//! }
//! ```

pub mod generations;
pub mod locations;
pub mod pool;

// Re-export core types
pub use cityscope_core::*;

pub use generations::PgGenerationStore;
pub use locations::PgLocationRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Location repository.
    pub locations: PgLocationRepository,
    /// Category generation store.
    pub generations: PgGenerationStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            locations: PgLocationRepository::new(pool.clone()),
            generations: PgGenerationStore::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations from the workspace `migrations/` directory.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("migration failed: {}", e)))?;
        Ok(())
    }
}
