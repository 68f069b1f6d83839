//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key was never stored, or was removed or evicted
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was stored but its TTL has elapsed
    #[error("Key expired: {0}")]
    Expired(String),

    /// Builder options were rejected
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl CacheError {
    // == Is Miss ==
    /// Returns true for errors a caller should treat as a cache miss.
    ///
    /// Both `NotFound` and `Expired` mean "go to the backing source".
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_) | CacheError::Expired(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
