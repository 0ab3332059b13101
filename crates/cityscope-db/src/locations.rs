//! Location repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use cityscope_core::{Error, Location, LocationRepository, NewLocation, Result};

/// PostgreSQL implementation of LocationRepository.
pub struct PgLocationRepository {
    pool: Pool<Postgres>,
}

impl PgLocationRepository {
    /// Create a new PgLocationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_location(row: &PgRow) -> Location {
    Location {
        id: row.get("id"),
        search_query: row.get("search_query"),
        formatted_query: row.get("formatted_query"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn find_by_query(&self, search_query: &str) -> Result<Option<Location>> {
        let row = sqlx::query(
            "SELECT id, search_query, formatted_query, latitude, longitude
             FROM locations
             WHERE search_query = $1",
        )
        .bind(search_query)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_location))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>> {
        let row = sqlx::query(
            "SELECT id, search_query, formatted_query, latitude, longitude
             FROM locations
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_location))
    }

    async fn insert(&self, location: &NewLocation) -> Result<Location> {
        // ON CONFLICT DO NOTHING returns no row when a concurrent resolution
        // of the same query won the insert; fall back to a re-read. Locations
        // are never deleted, so the re-read must find the winner's row.
        let row = sqlx::query(
            "INSERT INTO locations (search_query, formatted_query, latitude, longitude)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (search_query) DO NOTHING
             RETURNING id, search_query, formatted_query, latitude, longitude",
        )
        .bind(&location.search_query)
        .bind(&location.formatted_query)
        .bind(location.latitude)
        .bind(location.longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(r) => Ok(row_to_location(&r)),
            None => {
                debug!(
                    subsystem = "db",
                    component = "locations",
                    op = "insert",
                    search_query = %location.search_query,
                    "Insert lost a concurrent race, re-reading existing row"
                );
                self.find_by_query(&location.search_query).await?.ok_or_else(|| {
                    Error::Internal(format!(
                        "location '{}' missing after conflicting insert",
                        location.search_query
                    ))
                })
            }
        }
    }
}
