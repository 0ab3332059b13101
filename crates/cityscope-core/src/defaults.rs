//! Default configuration values.
//!
//! Everything here can be overridden through the environment; see each
//! constant's doc for the variable name.

/// Weather generation TTL, ms (`WEATHER_TTL_MS`).
pub const WEATHER_TTL_MS: i64 = 15_000;

/// Events generation TTL, ms (`EVENTS_TTL_MS`).
pub const EVENTS_TTL_MS: i64 = 30_000;

/// Movies generation TTL, ms (`MOVIES_TTL_MS`).
pub const MOVIES_TTL_MS: i64 = 30_000;

/// Per-call upstream request timeout, seconds (`UPSTREAM_TIMEOUT_SECS`).
pub const UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Geocoding endpoint (`GEOCODE_BASE_URL`).
pub const GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Weather forecast endpoint (`WEATHER_BASE_URL`).
pub const WEATHER_BASE_URL: &str = "https://api.darksky.net/forecast";

/// Events search endpoint (`EVENTS_BASE_URL`).
pub const EVENTS_BASE_URL: &str = "https://www.eventbriteapi.com/v3/events/search";

/// Movie search endpoint (`MOVIES_BASE_URL`).
pub const MOVIES_BASE_URL: &str = "https://api.themoviedb.org/3/search/movie";

/// Base URL movie poster paths are joined onto.
pub const MOVIE_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
