//! Mini Cache - An in-process generic cache engine
//!
//! Provides thread-safe key-value caching with TTL expiration and
//! LFU (default) or LRU eviction.

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod source;

pub use builder::CacheBuilder;
pub use cache::{Cache, CacheStats, SharedCache};
pub use config::{CacheOptions, EvictionPolicy};
pub use error::{CacheError, Result};
pub use source::{Datasource, ReadThrough};
