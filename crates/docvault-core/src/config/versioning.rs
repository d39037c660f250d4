//! Version engine configuration.

use serde::{Deserialize, Serialize};

/// Settings for the version engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersioningConfig {
    /// Maximum number of entries in the current-version cache.
    #[serde(default = "default_cache_capacity")]
    pub current_cache_capacity: u64,
    /// Time-to-live for current-version cache entries, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub current_cache_ttl_seconds: u64,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            current_cache_capacity: default_cache_capacity(),
            current_cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    1024
}

fn default_cache_ttl() -> u64 {
    300
}
