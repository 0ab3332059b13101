//! # cityscope-core
//!
//! Core types, traits, and abstractions for cityscope.
//!
//! This crate provides the data model (locations, category records,
//! generations), the error taxonomy, and the trait seams the other
//! cityscope crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{
    now_ms, Category, CategoryRecord, Event, Generation, GeocodedPlace, Location, Movie,
    NewLocation, WeatherReport,
};
pub use traits::{CategoryProvider, GenerationStore, GeocodeProvider, LocationRepository};
