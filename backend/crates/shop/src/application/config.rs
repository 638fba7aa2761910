//! Application Configuration
//!
//! Configuration for the Shop application layer.

use std::time::Duration;

use catalog::application::config::{MAX_PRESIGN_TTL, MIN_PRESIGN_TTL};

/// Shop application configuration
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Lifetime of the content link behind a download redirect
    pub download_ttl: Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            download_ttl: Duration::from_secs(10 * 60),
        }
    }
}

impl ShopConfig {
    /// Set the link lifetime, clamped to 5..=15 minutes
    pub fn with_download_ttl(mut self, ttl: Duration) -> Self {
        self.download_ttl = ttl.clamp(MIN_PRESIGN_TTL, MAX_PRESIGN_TTL);
        self
    }
}
