//! cityscope-api - HTTP API server for cityscope.
//!
//! Thin HTTP surface over the resolver and freshness engine: parse query
//! parameters, dispatch, serialize. All caching decisions live in
//! cityscope-cache; all upstream knowledge in cityscope-upstream.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cityscope_cache::{CategoryCache, LocationResolver, TtlConfig};
use cityscope_core::{GenerationStore, GeocodeProvider, LocationRepository};
use cityscope_db::{Database, PgGenerationStore, PgLocationRepository};
use cityscope_upstream::{
    DarkSkyProvider, EventbriteProvider, GoogleGeocoder, TmdbProvider, UpstreamConfig,
};

use handlers::{get_events, get_location, get_movies, get_weather, health_check};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Location repository, for category handlers re-reading by id.
    pub locations: Arc<dyn LocationRepository>,
    /// Search-query resolution.
    pub resolver: Arc<LocationResolver>,
    /// Cache-aside freshness engine.
    pub cache: Arc<CategoryCache>,
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    /// Internal failure: logged in full, reported generically.
    Internal(cityscope_core::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<cityscope_core::Error> for ApiError {
    fn from(err: cityscope_core::Error) -> Self {
        match err {
            cityscope_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            cityscope_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(
                    subsystem = "api",
                    error = %err,
                    "Request failed"
                );
                // The client never receives internal detail.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, something went wrong".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// BOOTSTRAP
// =============================================================================

fn init_tracing() {
    // LOG_FORMAT - "json" or "text" (default: "text")
    // RUST_LOG   - standard env filter
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cityscope_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing();

    // Get configuration from environment
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/cityscope".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Upstream providers (API keys come from the environment, never code)
    let upstream = UpstreamConfig::from_env()?;
    let geocoder: Arc<dyn GeocodeProvider> = Arc::new(GoogleGeocoder::from_config(&upstream)?);

    // Store handles are passed explicitly; no module-level singletons.
    let locations: Arc<dyn LocationRepository> =
        Arc::new(PgLocationRepository::new(db.pool.clone()));
    let store: Arc<dyn GenerationStore> = Arc::new(PgGenerationStore::new(db.pool.clone()));

    let ttls = TtlConfig::from_env();
    info!(
        weather_ttl_ms = ttls.weather_ms,
        events_ttl_ms = ttls.events_ms,
        movies_ttl_ms = ttls.movies_ms,
        "Category TTLs configured"
    );

    let cache = CategoryCache::new(store, ttls)
        .with_provider(Arc::new(DarkSkyProvider::from_config(&upstream)?))
        .with_provider(Arc::new(EventbriteProvider::from_config(&upstream)?))
        .with_provider(Arc::new(TmdbProvider::from_config(&upstream)?));

    let state = AppState {
        locations: locations.clone(),
        resolver: Arc::new(LocationResolver::new(locations, geocoder)),
        cache: Arc::new(cache),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/location", get(get_location))
        .route("/weather", get(get_weather))
        .route("/events", get(get_events))
        .route("/movies", get(get_movies))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
