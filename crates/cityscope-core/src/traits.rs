//! Repository and provider traits.
//!
//! The store and the third-party providers are external collaborators; these
//! traits are the seams the resolver and cache engine are generic over, so
//! tests can substitute in-memory and scripted implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, CategoryRecord, Generation, GeocodedPlace, Location, NewLocation};

/// Storage for resolved locations.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Look up a location by exact search-query match.
    async fn find_by_query(&self, search_query: &str) -> Result<Option<Location>>;

    /// Look up a location by store-assigned id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>>;

    /// Insert a new location, returning it with its store-assigned id.
    ///
    /// Must be resolve-or-insert atomic at the store level: a concurrent
    /// insert of the same `search_query` yields the already-persisted row,
    /// never a duplicate.
    async fn insert(&self, location: &NewLocation) -> Result<Location>;
}

/// Storage for category generations, keyed by (location_id, category).
#[async_trait]
pub trait GenerationStore: Send + Sync {
    /// Load the current generation, or `None` if this (location, category)
    /// has never been fetched.
    async fn load(&self, location_id: i64, category: Category) -> Result<Option<Generation>>;

    /// Atomically replace the generation: delete existing rows, insert
    /// `records`, and record `fetched_at` as the generation timestamp.
    ///
    /// A crash or failure mid-replace must never leave a mixed generation.
    async fn replace(
        &self,
        location_id: i64,
        category: Category,
        records: &[CategoryRecord],
        fetched_at: i64,
    ) -> Result<()>;
}

/// Geocoding provider: free-text query to candidate places.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Geocode a query. An empty vec means the provider found no matches.
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodedPlace>>;
}

/// Upstream provider for one category's data.
///
/// Adapters build one outbound request and normalize the payload; no caching,
/// no retries. `now_ms` stamps `created_at` on the returned records.
#[async_trait]
pub trait CategoryProvider: Send + Sync {
    /// The category this provider serves.
    fn category(&self) -> Category;

    /// Fetch and normalize records for `location`.
    async fn fetch(&self, location: &Location, now_ms: i64) -> Result<Vec<CategoryRecord>>;
}
