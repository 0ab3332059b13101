//! The Movie Database (TMDB) adapter and normalizer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use cityscope_core::{
    defaults, Category, CategoryProvider, CategoryRecord, Error, Location, Movie, Result,
};

use crate::config::{build_client, UpstreamConfig};

/// Movies adapter backed by the TMDB search API.
///
/// Searches by the location's original query text, so "Seattle" returns
/// movies associated with that name.
pub struct TmdbProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbProvider {
    /// Create an adapter from upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self::new(
            build_client(config.timeout)?,
            config.movies_base_url.clone(),
            config.movie_api_key.clone(),
        ))
    }

    /// Create an adapter with an explicit client and endpoint.
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieSearchResponse {
    #[serde(default)]
    results: Vec<RawMovie>,
}

/// One movie from the search payload.
#[derive(Debug, Default, Deserialize)]
pub struct RawMovie {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
}

/// Normalize one raw movie into a movie record.
///
/// The title is required; an item without one is skipped. Vote stats and
/// popularity default to zero, overview and release date to empty strings,
/// and the poster path (when present) is joined onto the image base URL.
pub fn normalize_movie(raw: &RawMovie, now_ms: i64, location_id: i64) -> Option<Movie> {
    let title = raw.title.clone()?;
    Some(Movie {
        title,
        overview: raw.overview.clone().unwrap_or_default(),
        average_votes: raw.vote_average.unwrap_or(0.0),
        total_votes: raw.vote_count.unwrap_or(0),
        image_url: raw
            .poster_path
            .as_deref()
            .map(|p| format!("{}{}", defaults::MOVIE_IMAGE_BASE_URL, p)),
        popularity: raw.popularity.unwrap_or(0.0),
        released_on: raw.release_date.clone().unwrap_or_default(),
        created_at: now_ms,
        location_id,
    })
}

#[async_trait]
impl CategoryProvider for TmdbProvider {
    fn category(&self) -> Category {
        Category::Movies
    }

    async fn fetch(&self, location: &Location, now_ms: i64) -> Result<Vec<CategoryRecord>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", location.search_query.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "movies provider returned status {}",
                status
            )));
        }

        let payload: MovieSearchResponse = response.json().await?;

        let records: Vec<CategoryRecord> = payload
            .results
            .iter()
            .filter_map(|raw| normalize_movie(raw, now_ms, location.id))
            .map(CategoryRecord::Movie)
            .collect();

        debug!(
            subsystem = "upstream",
            component = "movies",
            op = "fetch",
            location_id = location.id,
            result_count = records.len(),
            "Movies normalized"
        );
        Ok(records)
    }
}
