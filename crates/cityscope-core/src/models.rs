//! Data model for cityscope: locations, category records, and generations.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Used as the freshness clock for generations; never a business timestamp.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// A cached dataset scoped to a location.
///
/// Each category owns an independent TTL and upstream provider; dispatch is
/// always through this enum, never through string comparison on table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Weather,
    Events,
    Movies,
}

impl Category {
    /// All categories, in a stable order.
    pub const ALL: [Category; 3] = [Category::Weather, Category::Events, Category::Movies];

    /// The store table holding this category's rows.
    pub fn table(&self) -> &'static str {
        match self {
            Category::Weather => "weather",
            Category::Events => "events",
            Category::Movies => "movies",
        }
    }

    /// Stable string key, used in the `category_fetches` marker table.
    pub fn as_str(&self) -> &'static str {
        self.table()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved location: the stable cache key every category is scoped to.
///
/// Created on first resolution of a never-seen search query; immutable
/// thereafter; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Store-assigned id.
    pub id: i64,
    /// Original free-text query; unique per resolved location.
    pub search_query: String,
    /// Canonical address string from the geocoding provider.
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A location not yet persisted (no store-assigned id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One result from the geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A daily weather forecast row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub forecast: String,
    pub formatted_date: String,
    /// Insertion timestamp, ms since epoch. Freshness clock only.
    pub created_at: i64,
    pub location_id: i64,
}

/// A local event row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub link: String,
    pub name: String,
    pub event_date: String,
    pub summary: String,
    pub created_at: i64,
    pub location_id: i64,
}

/// A movie row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub total_votes: i64,
    pub image_url: Option<String>,
    pub popularity: f64,
    pub released_on: String,
    pub created_at: i64,
    pub location_id: i64,
}

/// A category record: one tagged variant per category.
///
/// Serializes untagged so each handler returns the plain per-category shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryRecord {
    Weather(WeatherReport),
    Event(Event),
    Movie(Movie),
}

impl CategoryRecord {
    /// The category this record belongs to.
    pub fn category(&self) -> Category {
        match self {
            CategoryRecord::Weather(_) => Category::Weather,
            CategoryRecord::Event(_) => Category::Events,
            CategoryRecord::Movie(_) => Category::Movies,
        }
    }

    /// Insertion timestamp (ms since epoch).
    pub fn created_at(&self) -> i64 {
        match self {
            CategoryRecord::Weather(w) => w.created_at,
            CategoryRecord::Event(e) => e.created_at,
            CategoryRecord::Movie(m) => m.created_at,
        }
    }

    /// Foreign key to the owning location.
    pub fn location_id(&self) -> i64 {
        match self {
            CategoryRecord::Weather(w) => w.location_id,
            CategoryRecord::Event(e) => e.location_id,
            CategoryRecord::Movie(m) => m.location_id,
        }
    }
}

/// The complete set of rows produced by one fetch-and-populate cycle for a
/// given (location, category), plus the time it was fetched.
///
/// `records` may be empty: a zero-result upstream response is still a valid,
/// fresh generation and must not trigger a refetch until the TTL elapses.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// When this generation was fetched, ms since epoch.
    pub fetched_at: i64,
    pub records: Vec<CategoryRecord>,
}
