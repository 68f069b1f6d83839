//! Configuration Module
//!
//! Immutable cache options, loadable from serde sources or environment variables.

use std::env;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::builder;
use crate::cache::SharedCache;
use crate::error::{CacheError, Result};

// == Eviction Policy ==
/// Which entry a full cache gives up for a new key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EvictionPolicy {
    /// Least frequently used (fewest sets and reads)
    #[default]
    Frequency,
    /// Least recently used
    Recency,
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frequency" | "lfu" => Ok(EvictionPolicy::Frequency),
            "recency" | "lru" => Ok(EvictionPolicy::Recency),
            other => Err(CacheError::Configuration(format!(
                "unknown eviction policy: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for EvictionPolicy {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Frequency => f.write_str("frequency"),
            EvictionPolicy::Recency => f.write_str("recency"),
        }
    }
}

// == Cache Options ==
/// Cache construction parameters.
///
/// Options are plain values; nothing is checked until [`CacheOptions::validate`]
/// or a build call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Eviction policy
    #[serde(default)]
    pub policy: EvictionPolicy,
    /// Expiration used by `set`; None = entries never expire
    #[serde(
        default,
        rename = "default_expiration_ms",
        with = "duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_expiration: Option<Duration>,
}

impl CacheOptions {
    /// Options for a frequency cache whose entries never expire.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: EvictionPolicy::Frequency,
            default_expiration: None,
        }
    }

    /// Loads options from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_POLICY` - `frequency`/`lfu` or `recency`/`lru` (default: frequency)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: never expires)
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(raw) = env::var("CACHE_CAPACITY") {
            options.capacity = raw.trim().parse().map_err(|_| {
                CacheError::Configuration(format!(
                    "CACHE_CAPACITY must be a positive integer, got {raw:?}"
                ))
            })?;
        }
        if let Ok(raw) = env::var("CACHE_POLICY") {
            options.policy = raw.parse()?;
        }
        if let Ok(raw) = env::var("CACHE_DEFAULT_TTL_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                CacheError::Configuration(format!(
                    "CACHE_DEFAULT_TTL_MS must be a number of milliseconds, got {raw:?}"
                ))
            })?;
            options.default_expiration = Some(Duration::from_millis(millis));
        }

        options.validate()?;
        Ok(options)
    }

    /// Checks the options without building anything, returning the checked capacity.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity).ok_or_else(|| {
            CacheError::Configuration("capacity must be greater than zero".to_string())
        })
    }

    /// Validates the options and builds the cache they describe.
    pub fn build<V>(&self) -> Result<SharedCache<V>>
    where
        V: Clone + Send + Sync + 'static,
    {
        builder::build(self)
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::new(1000)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(ttl) => {
                serializer.serialize_some(&u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
