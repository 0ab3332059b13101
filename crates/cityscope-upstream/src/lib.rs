//! # cityscope-upstream
//!
//! Third-party provider adapters for cityscope: one reqwest client per
//! provider (geocode, weather, events, movies), each pairing request
//! construction with a pure normalizer from raw payload items to category
//! records. Adapters carry no cache and no retry logic; failures surface as
//! `Error::Upstream`.

pub mod config;
pub mod events;
pub mod geocode;
pub mod movies;
pub mod weather;

pub use config::{build_client, UpstreamConfig};
pub use events::EventbriteProvider;
pub use geocode::GoogleGeocoder;
pub use movies::TmdbProvider;
pub use weather::DarkSkyProvider;
