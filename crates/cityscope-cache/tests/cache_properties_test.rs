//! Correctness properties of the resolver and the freshness engine:
//! idempotent resolution, freshness, staleness, empty-generation caching,
//! and no partial generations on failed refresh.

use std::sync::Arc;

use cityscope_cache::mock::{
    MemoryGenerationStore, MemoryLocationRepository, ScriptedGeocoder, ScriptedProvider,
};
use cityscope_cache::{CategoryCache, LocationResolver, TtlConfig};
use cityscope_core::{
    Category, CategoryRecord, Error, GeocodedPlace, Location, Result, WeatherReport,
};

fn seattle_place() -> GeocodedPlace {
    GeocodedPlace {
        formatted_address: "Seattle, WA 98105, USA".to_string(),
        latitude: 47.66,
        longitude: -122.3,
    }
}

fn test_location() -> Location {
    Location {
        id: 1,
        search_query: "98105".to_string(),
        formatted_query: "Seattle, WA 98105, USA".to_string(),
        latitude: 47.66,
        longitude: -122.3,
    }
}

fn weather_batch(n: usize, tag: &str) -> Result<Vec<CategoryRecord>> {
    Ok((0..n)
        .map(|i| {
            CategoryRecord::Weather(WeatherReport {
                forecast: format!("{} {}", tag, i),
                formatted_date: format!("Day {}", i),
                created_at: 0,
                location_id: 1,
            })
        })
        .collect())
}

fn test_ttls() -> TtlConfig {
    TtlConfig {
        weather_ms: 15_000,
        events_ms: 30_000,
        movies_ms: 30_000,
    }
}

// ─── Resolver ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_miss_populates_then_hit_skips_geocoding() {
    let repo = Arc::new(MemoryLocationRepository::new());
    let geocoder = Arc::new(ScriptedGeocoder::returning(vec![seattle_place()]));
    let resolver = LocationResolver::new(repo.clone(), geocoder.clone());

    let first = resolver.resolve("98105").await.unwrap();
    assert_eq!(first.search_query, "98105");
    assert_eq!(first.formatted_query, "Seattle, WA 98105, USA");
    assert_eq!(first.latitude, 47.66);
    assert_eq!(first.longitude, -122.3);
    assert_eq!(geocoder.calls(), 1);
    assert_eq!(repo.len(), 1);

    let second = resolver.resolve("98105").await.unwrap();
    assert_eq!(second, first);
    // Hit path: zero additional upstream calls, zero additional rows.
    assert_eq!(geocoder.calls(), 1);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn resolve_is_idempotent_under_concurrency() {
    let repo = Arc::new(MemoryLocationRepository::new());
    let geocoder = Arc::new(ScriptedGeocoder::returning(vec![seattle_place()]));
    let resolver = Arc::new(LocationResolver::new(repo.clone(), geocoder));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve("98105").await })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap().id);
    }

    assert_eq!(repo.len(), 1);
    assert!(ids.iter().all(|id| *id == ids[0]));
}

#[tokio::test]
async fn resolve_zero_geocoding_results_is_not_found() {
    let repo = Arc::new(MemoryLocationRepository::new());
    let geocoder = Arc::new(ScriptedGeocoder::empty());
    let resolver = LocationResolver::new(repo.clone(), geocoder);

    assert!(matches!(
        resolver.resolve("nowhere-at-all").await,
        Err(Error::NotFound(_))
    ));
    assert!(repo.is_empty());
}

#[tokio::test]
async fn resolve_rejects_blank_query_before_any_call() {
    let repo = Arc::new(MemoryLocationRepository::new());
    let geocoder = Arc::new(ScriptedGeocoder::returning(vec![seattle_place()]));
    let resolver = LocationResolver::new(repo, geocoder.clone());

    assert!(matches!(
        resolver.resolve("   ").await,
        Err(Error::InvalidInput(_))
    ));
    assert_eq!(geocoder.calls(), 0);
}

// ─── Freshness engine ──────────────────────────────────────────────────────

#[tokio::test]
async fn cold_lookup_populates_and_second_call_hits() {
    let store = Arc::new(MemoryGenerationStore::new());
    let provider = Arc::new(ScriptedProvider::new(
        Category::Weather,
        vec![weather_batch(7, "clear")],
    ));
    let cache = CategoryCache::new(store.clone(), test_ttls()).with_provider(provider.clone());
    let location = test_location();

    let first = cache.get(Category::Weather, &location).await.unwrap();
    assert_eq!(first.len(), 7);
    assert_eq!(provider.calls(), 1);
    assert_eq!(store.stored_count(1, Category::Weather), Some(7));

    // Within TTL: identical records, zero upstream calls.
    let second = cache.get(Category::Weather, &location).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn stale_generation_is_fully_replaced() {
    let store = Arc::new(MemoryGenerationStore::new());
    let provider = Arc::new(ScriptedProvider::new(
        Category::Weather,
        vec![weather_batch(7, "old"), weather_batch(5, "new")],
    ));
    let cache = CategoryCache::new(store.clone(), test_ttls()).with_provider(provider.clone());
    let location = test_location();

    cache.get(Category::Weather, &location).await.unwrap();
    store.backdate(1, Category::Weather, 16_000);

    let refreshed = cache.get(Category::Weather, &location).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(refreshed.len(), 5);
    // Only the new generation survives, no mixed rows.
    assert_eq!(store.stored_count(1, Category::Weather), Some(5));
    for record in &refreshed {
        match record {
            CategoryRecord::Weather(w) => assert!(w.forecast.starts_with("new")),
            other => panic!("unexpected record {:?}", other),
        }
    }
}

#[tokio::test]
async fn empty_upstream_result_is_cached_as_fresh_generation() {
    let store = Arc::new(MemoryGenerationStore::new());
    let provider = Arc::new(ScriptedProvider::new(Category::Events, vec![Ok(vec![])]));
    let cache = CategoryCache::new(store.clone(), test_ttls()).with_provider(provider.clone());
    let location = test_location();

    let first = cache.get(Category::Events, &location).await.unwrap();
    assert!(first.is_empty());
    assert_eq!(store.stored_count(1, Category::Events), Some(0));

    // A genuinely empty result must not be refetched on every call.
    let second = cache.get(Category::Events, &location).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn failed_refresh_leaves_old_generation_complete() {
    let store = Arc::new(MemoryGenerationStore::new());
    let provider = Arc::new(ScriptedProvider::new(
        Category::Weather,
        vec![
            weather_batch(7, "old"),
            Err(Error::Upstream("injected mid-fetch failure".to_string())),
            weather_batch(4, "retry"),
        ],
    ));
    let cache = CategoryCache::new(store.clone(), test_ttls()).with_provider(provider.clone());
    let location = test_location();

    cache.get(Category::Weather, &location).await.unwrap();
    store.backdate(1, Category::Weather, 16_000);

    // Upstream fails during refresh: the error surfaces and the stored rows
    // are still the complete old generation, never a partial one.
    assert!(matches!(
        cache.get(Category::Weather, &location).await,
        Err(Error::Upstream(_))
    ));
    assert_eq!(store.stored_count(1, Category::Weather), Some(7));

    // A retry succeeds cleanly and replaces the whole generation.
    let retried = cache.get(Category::Weather, &location).await.unwrap();
    assert_eq!(retried.len(), 4);
    assert_eq!(store.stored_count(1, Category::Weather), Some(4));
}

#[tokio::test]
async fn only_the_requested_category_is_fetched() {
    let store = Arc::new(MemoryGenerationStore::new());
    let weather = Arc::new(ScriptedProvider::new(
        Category::Weather,
        vec![weather_batch(2, "clear")],
    ));
    let events = Arc::new(ScriptedProvider::new(Category::Events, vec![Ok(vec![])]));
    let cache = CategoryCache::new(store, test_ttls())
        .with_provider(weather.clone())
        .with_provider(events.clone());

    cache.get(Category::Weather, &test_location()).await.unwrap();
    assert_eq!(weather.calls(), 1);
    assert_eq!(events.calls(), 0);
}

#[tokio::test]
async fn unregistered_category_is_a_config_error() {
    let store = Arc::new(MemoryGenerationStore::new());
    let cache = CategoryCache::new(store, test_ttls());

    assert!(matches!(
        cache.get(Category::Movies, &test_location()).await,
        Err(Error::Config(_))
    ));
}
