//! # cityscope-cache
//!
//! The stateful core of cityscope: the location resolver (search query to
//! stable location key) and the category cache manager (cache-aside with
//! per-category TTL). Both are generic over the store and provider traits
//! from cityscope-core, so the engine's correctness properties are testable
//! without a database or network.

pub mod freshness;
pub mod mock;
pub mod resolver;

pub use freshness::{CategoryCache, TtlConfig};
pub use resolver::LocationResolver;
