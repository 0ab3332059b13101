//! Generation store implementation.
//!
//! One generation is the complete row set for a (location, category) pair.
//! The `category_fetches` marker table carries the generation timestamp, so
//! an empty upstream result is still a cached, fresh generation rather than
//! a row set indistinguishable from "never fetched".

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;

use cityscope_core::{
    Category, CategoryRecord, Error, Event, Generation, GenerationStore, Movie, Result,
    WeatherReport,
};

/// PostgreSQL implementation of GenerationStore.
pub struct PgGenerationStore {
    pool: Pool<Postgres>,
}

impl PgGenerationStore {
    /// Create a new PgGenerationStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn load_rows(&self, location_id: i64, category: Category) -> Result<Vec<CategoryRecord>> {
        // Table names come from Category::table(), a closed set of static
        // strings; never from request input.
        let rows = match category {
            Category::Weather => sqlx::query(
                "SELECT forecast, formatted_date, created_at, location_id
                 FROM weather WHERE location_id = $1 ORDER BY id",
            ),
            Category::Events => sqlx::query(
                "SELECT link, name, event_date, summary, created_at, location_id
                 FROM events WHERE location_id = $1 ORDER BY id",
            ),
            Category::Movies => sqlx::query(
                "SELECT title, overview, average_votes, total_votes, image_url,
                        popularity, released_on, created_at, location_id
                 FROM movies WHERE location_id = $1 ORDER BY id",
            ),
        }
        .bind(location_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(|r| row_to_record(category, r)).collect())
    }
}

fn row_to_record(category: Category, row: &PgRow) -> CategoryRecord {
    match category {
        Category::Weather => CategoryRecord::Weather(WeatherReport {
            forecast: row.get("forecast"),
            formatted_date: row.get("formatted_date"),
            created_at: row.get("created_at"),
            location_id: row.get("location_id"),
        }),
        Category::Events => CategoryRecord::Event(Event {
            link: row.get("link"),
            name: row.get("name"),
            event_date: row.get("event_date"),
            summary: row.get("summary"),
            created_at: row.get("created_at"),
            location_id: row.get("location_id"),
        }),
        Category::Movies => CategoryRecord::Movie(Movie {
            title: row.get("title"),
            overview: row.get("overview"),
            average_votes: row.get("average_votes"),
            total_votes: row.get("total_votes"),
            image_url: row.get("image_url"),
            popularity: row.get("popularity"),
            released_on: row.get("released_on"),
            created_at: row.get("created_at"),
            location_id: row.get("location_id"),
        }),
    }
}

async fn insert_record(
    tx: &mut Transaction<'_, Postgres>,
    category: Category,
    record: &CategoryRecord,
) -> Result<()> {
    match (category, record) {
        (Category::Weather, CategoryRecord::Weather(w)) => {
            sqlx::query(
                "INSERT INTO weather (forecast, formatted_date, created_at, location_id)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(&w.forecast)
            .bind(&w.formatted_date)
            .bind(w.created_at)
            .bind(w.location_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }
        (Category::Events, CategoryRecord::Event(e)) => {
            sqlx::query(
                "INSERT INTO events (link, name, event_date, summary, created_at, location_id)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&e.link)
            .bind(&e.name)
            .bind(&e.event_date)
            .bind(&e.summary)
            .bind(e.created_at)
            .bind(e.location_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }
        (Category::Movies, CategoryRecord::Movie(m)) => {
            sqlx::query(
                "INSERT INTO movies (title, overview, average_votes, total_votes, image_url,
                                     popularity, released_on, created_at, location_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(&m.title)
            .bind(&m.overview)
            .bind(m.average_votes)
            .bind(m.total_votes)
            .bind(&m.image_url)
            .bind(m.popularity)
            .bind(&m.released_on)
            .bind(m.created_at)
            .bind(m.location_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }
        (category, record) => {
            return Err(Error::InvalidInput(format!(
                "record variant {:?} does not belong to category '{}'",
                record.category(),
                category
            )))
        }
    }
    Ok(())
}

#[async_trait]
impl GenerationStore for PgGenerationStore {
    async fn load(&self, location_id: i64, category: Category) -> Result<Option<Generation>> {
        let fetched_at: Option<i64> = sqlx::query_scalar(
            "SELECT fetched_at FROM category_fetches
             WHERE location_id = $1 AND category = $2",
        )
        .bind(location_id)
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(fetched_at) = fetched_at else {
            return Ok(None);
        };

        let records = self.load_rows(location_id, category).await?;
        Ok(Some(Generation {
            fetched_at,
            records,
        }))
    }

    async fn replace(
        &self,
        location_id: i64,
        category: Category,
        records: &[CategoryRecord],
        fetched_at: i64,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Delete the old generation, if any.
        let delete = format!("DELETE FROM {} WHERE location_id = $1", category.table());
        sqlx::query(&delete)
            .bind(location_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        for record in records {
            insert_record(&mut tx, category, record).await?;
        }

        sqlx::query(
            "INSERT INTO category_fetches (location_id, category, fetched_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (location_id, category)
             DO UPDATE SET fetched_at = EXCLUDED.fetched_at",
        )
        .bind(location_id)
        .bind(category.as_str())
        .bind(fetched_at)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "generations",
            op = "replace",
            location_id,
            category = %category,
            result_count = records.len(),
            "Generation replaced"
        );
        Ok(())
    }
}
