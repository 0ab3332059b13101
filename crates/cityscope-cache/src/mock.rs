//! In-memory mock implementations of the store and provider traits.
//!
//! Used by the resolver and freshness tests to count upstream calls and
//! manipulate generation timestamps without a database or network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use cityscope_core::{
    Category, CategoryProvider, CategoryRecord, Error, Generation, GenerationStore, GeocodedPlace,
    GeocodeProvider, Location, LocationRepository, NewLocation, Result,
};

/// In-memory location repository with resolve-or-insert semantics.
pub struct MemoryLocationRepository {
    rows: Mutex<Vec<Location>>,
    next_id: AtomicI64,
}

impl MemoryLocationRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.lock().expect("mock lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LocationRepository for MemoryLocationRepository {
    async fn find_by_query(&self, search_query: &str) -> Result<Option<Location>> {
        let rows = self.rows.lock().expect("mock lock poisoned");
        Ok(rows.iter().find(|l| l.search_query == search_query).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>> {
        let rows = self.rows.lock().expect("mock lock poisoned");
        Ok(rows.iter().find(|l| l.id == id).cloned())
    }

    async fn insert(&self, location: &NewLocation) -> Result<Location> {
        let mut rows = self.rows.lock().expect("mock lock poisoned");
        // Unique search_query: a losing concurrent insert observes the
        // winner's row, exactly like ON CONFLICT DO NOTHING plus re-read.
        if let Some(existing) = rows.iter().find(|l| l.search_query == location.search_query) {
            return Ok(existing.clone());
        }
        let row = Location {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            search_query: location.search_query.clone(),
            formatted_query: location.formatted_query.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        };
        rows.push(row.clone());
        Ok(row)
    }
}

/// In-memory generation store with atomic replace.
#[derive(Default)]
pub struct MemoryGenerationStore {
    generations: Mutex<HashMap<(i64, Category), Generation>>,
}

impl MemoryGenerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewind a stored generation's fetch time by `delta_ms`, simulating the
    /// passage of wall-clock time without sleeping.
    pub fn backdate(&self, location_id: i64, category: Category, delta_ms: i64) {
        let mut generations = self.generations.lock().expect("mock lock poisoned");
        if let Some(generation) = generations.get_mut(&(location_id, category)) {
            generation.fetched_at -= delta_ms;
        }
    }

    /// The stored record count for a (location, category), or `None` if the
    /// pair has never been fetched.
    pub fn stored_count(&self, location_id: i64, category: Category) -> Option<usize> {
        let generations = self.generations.lock().expect("mock lock poisoned");
        generations
            .get(&(location_id, category))
            .map(|g| g.records.len())
    }
}

#[async_trait]
impl GenerationStore for MemoryGenerationStore {
    async fn load(&self, location_id: i64, category: Category) -> Result<Option<Generation>> {
        let generations = self.generations.lock().expect("mock lock poisoned");
        Ok(generations.get(&(location_id, category)).cloned())
    }

    async fn replace(
        &self,
        location_id: i64,
        category: Category,
        records: &[CategoryRecord],
        fetched_at: i64,
    ) -> Result<()> {
        let mut generations = self.generations.lock().expect("mock lock poisoned");
        generations.insert(
            (location_id, category),
            Generation {
                fetched_at,
                records: records.to_vec(),
            },
        );
        Ok(())
    }
}

/// Geocoder returning a fixed result set and counting calls.
pub struct ScriptedGeocoder {
    places: Vec<GeocodedPlace>,
    calls: AtomicUsize,
}

impl ScriptedGeocoder {
    /// A geocoder that always returns `places`.
    pub fn returning(places: Vec<GeocodedPlace>) -> Self {
        Self {
            places,
            calls: AtomicUsize::new(0),
        }
    }

    /// A geocoder that always finds zero matches.
    pub fn empty() -> Self {
        Self::returning(Vec::new())
    }

    /// Number of geocoding calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeProvider for ScriptedGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Vec<GeocodedPlace>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.clone())
    }
}

/// Category provider that replays scripted responses and counts calls.
pub struct ScriptedProvider {
    category: Category,
    responses: Mutex<VecDeque<Result<Vec<CategoryRecord>>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// A provider that replays `responses` in order, then fails.
    pub fn new(category: Category, responses: Vec<Result<Vec<CategoryRecord>>>) -> Self {
        Self {
            category,
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of upstream fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryProvider for ScriptedProvider {
    fn category(&self) -> Category {
        self.category
    }

    async fn fetch(&self, _location: &Location, now_ms: i64) -> Result<Vec<CategoryRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front();
        match next {
            Some(Ok(mut records)) => {
                // Stamp created_at the way a real normalizer does.
                for record in &mut records {
                    match record {
                        CategoryRecord::Weather(w) => w.created_at = now_ms,
                        CategoryRecord::Event(e) => e.created_at = now_ms,
                        CategoryRecord::Movie(m) => m.created_at = now_ms,
                    }
                }
                Ok(records)
            }
            Some(Err(e)) => Err(e),
            None => Err(Error::Upstream("scripted responses exhausted".to_string())),
        }
    }
}
