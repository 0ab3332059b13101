//! Location resolution: free-text query to a stable location record.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use cityscope_core::{Error, GeocodeProvider, Location, LocationRepository, NewLocation, Result};

/// Maps search queries to locations, using the store as a cache and the
/// geocoding provider as the source of truth on miss.
pub struct LocationResolver {
    repo: Arc<dyn LocationRepository>,
    geocoder: Arc<dyn GeocodeProvider>,
}

impl LocationResolver {
    /// Create a resolver over a location repository and geocoding provider.
    pub fn new(repo: Arc<dyn LocationRepository>, geocoder: Arc<dyn GeocodeProvider>) -> Self {
        Self { repo, geocoder }
    }

    /// Resolve a free-text query to a location.
    ///
    /// On a store hit the cached row is returned unchanged with zero upstream
    /// calls. On miss the query is geocoded; zero provider matches fail with
    /// `Error::NotFound`, otherwise the top result is persisted and returned
    /// with its store-assigned id. Resolution is idempotent: the same query
    /// never creates two rows, even under concurrent calls (the repository's
    /// insert is resolve-or-insert atomic).
    pub async fn resolve(&self, search_query: &str) -> Result<Location> {
        let query = search_query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }

        let start = Instant::now();
        if let Some(existing) = self.repo.find_by_query(query).await? {
            debug!(
                subsystem = "cache",
                component = "resolver",
                op = "resolve",
                search_query = %query,
                location_id = existing.id,
                "Location resolved from store"
            );
            return Ok(existing);
        }

        let places = self.geocoder.geocode(query).await?;
        let Some(top) = places.into_iter().next() else {
            return Err(Error::NotFound(format!(
                "no geocoding results for '{}'",
                query
            )));
        };

        let location = self
            .repo
            .insert(&NewLocation {
                search_query: query.to_string(),
                formatted_query: top.formatted_address,
                latitude: top.latitude,
                longitude: top.longitude,
            })
            .await?;

        info!(
            subsystem = "cache",
            component = "resolver",
            op = "resolve",
            search_query = %query,
            location_id = location.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Location resolved via geocoding and persisted"
        );
        Ok(location)
    }
}
