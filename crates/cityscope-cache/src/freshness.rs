//! The cache-aside freshness engine.
//!
//! One generic decision per call, keyed by (location, category):
//! serve stored rows while fresh, invalidate-and-refresh when stale, or
//! fetch-and-populate when the pair has never been fetched. Per-category
//! TTLs are configuration, not hardcoded per call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use cityscope_core::{
    defaults, now_ms, Category, CategoryProvider, CategoryRecord, Error, GenerationStore, Location,
    Result,
};

/// Per-category time-to-live values, milliseconds.
#[derive(Debug, Clone)]
pub struct TtlConfig {
    pub weather_ms: i64,
    pub events_ms: i64,
    pub movies_ms: i64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            weather_ms: defaults::WEATHER_TTL_MS,
            events_ms: defaults::EVENTS_TTL_MS,
            movies_ms: defaults::MOVIES_TTL_MS,
        }
    }
}

fn env_ms(var: &str, default: i64) -> i64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

impl TtlConfig {
    /// Load TTLs from `WEATHER_TTL_MS` / `EVENTS_TTL_MS` / `MOVIES_TTL_MS`,
    /// falling back to the defaults.
    pub fn from_env() -> Self {
        Self {
            weather_ms: env_ms("WEATHER_TTL_MS", defaults::WEATHER_TTL_MS),
            events_ms: env_ms("EVENTS_TTL_MS", defaults::EVENTS_TTL_MS),
            movies_ms: env_ms("MOVIES_TTL_MS", defaults::MOVIES_TTL_MS),
        }
    }

    /// The TTL for one category.
    pub fn ttl_for(&self, category: Category) -> i64 {
        match category {
            Category::Weather => self.weather_ms,
            Category::Events => self.events_ms,
            Category::Movies => self.movies_ms,
        }
    }
}

/// The freshness engine: cache-aside with per-category TTL.
pub struct CategoryCache {
    store: Arc<dyn GenerationStore>,
    providers: HashMap<Category, Arc<dyn CategoryProvider>>,
    ttls: TtlConfig,
}

impl CategoryCache {
    /// Create an engine over a generation store with the given TTLs.
    pub fn new(store: Arc<dyn GenerationStore>, ttls: TtlConfig) -> Self {
        Self {
            store,
            providers: HashMap::new(),
            ttls,
        }
    }

    /// Register the upstream provider for its category.
    pub fn with_provider(mut self, provider: Arc<dyn CategoryProvider>) -> Self {
        self.providers.insert(provider.category(), provider);
        self
    }

    /// Return cached-or-fresh records for one category of one location.
    ///
    /// Only the requested category is ever fetched. Concurrent callers may
    /// both observe staleness and refresh twice; each refresh is individually
    /// atomic, so the stored state is always a single complete generation.
    pub async fn get(&self, category: Category, location: &Location) -> Result<Vec<CategoryRecord>> {
        let start = Instant::now();
        let ttl = self.ttls.ttl_for(category);
        let now = now_ms();

        if let Some(generation) = self.store.load(location.id, category).await? {
            let age = now - generation.fetched_at;
            if age <= ttl {
                debug!(
                    subsystem = "cache",
                    component = "freshness",
                    op = "get",
                    category = %category,
                    location_id = location.id,
                    cache_outcome = "hit",
                    age_ms = age,
                    ttl_ms = ttl,
                    result_count = generation.records.len(),
                    "Serving stored generation"
                );
                return Ok(generation.records);
            }

            debug!(
                subsystem = "cache",
                component = "freshness",
                op = "get",
                category = %category,
                location_id = location.id,
                age_ms = age,
                ttl_ms = ttl,
                "Generation stale, refreshing"
            );
            let records = self.refresh(category, location, now).await?;
            self.log_refresh(category, location, "refreshed", records.len(), start);
            return Ok(records);
        }

        let records = self.refresh(category, location, now).await?;
        self.log_refresh(category, location, "populated", records.len(), start);
        Ok(records)
    }

    /// Fetch-and-populate: upstream first, then one atomic store replace.
    ///
    /// The store is untouched until the upstream fetch has succeeded, so an
    /// upstream failure leaves the previous generation complete and intact.
    async fn refresh(
        &self,
        category: Category,
        location: &Location,
        now: i64,
    ) -> Result<Vec<CategoryRecord>> {
        let provider = self.providers.get(&category).ok_or_else(|| {
            Error::Config(format!("no provider registered for category '{}'", category))
        })?;

        let records = provider.fetch(location, now).await?;
        self.store
            .replace(location.id, category, &records, now)
            .await?;
        Ok(records)
    }

    fn log_refresh(
        &self,
        category: Category,
        location: &Location,
        outcome: &str,
        count: usize,
        start: Instant,
    ) {
        info!(
            subsystem = "cache",
            component = "freshness",
            op = "get",
            category = %category,
            location_id = location.id,
            cache_outcome = outcome,
            result_count = count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Category data refreshed from upstream"
        );
    }
}
