//! Application Configuration
//!
//! Configuration for the Catalog application layer.

use std::time::Duration;

/// Shortest lifetime of a presigned link
pub const MIN_PRESIGN_TTL: Duration = Duration::from_secs(5 * 60);
/// Longest lifetime of a presigned link
pub const MAX_PRESIGN_TTL: Duration = Duration::from_secs(15 * 60);

/// Catalog application configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Lifetime of poster and content links, within 5 to 15 minutes
    pub presign_ttl: Duration,
    /// Body limit of the multipart upload of `POST /books`
    pub max_upload_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            presign_ttl: Duration::from_secs(10 * 60),
            max_upload_bytes: 50 * 1024 * 1024, // 50 MiB
        }
    }
}

impl CatalogConfig {
    /// Set the link lifetime, clamped into the allowed window
    pub fn with_presign_ttl(mut self, ttl: Duration) -> Self {
        self.presign_ttl = ttl.clamp(MIN_PRESIGN_TTL, MAX_PRESIGN_TTL);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presign_ttl_is_clamped() {
        let short = CatalogConfig::default().with_presign_ttl(Duration::from_secs(10));
        assert_eq!(short.presign_ttl, MIN_PRESIGN_TTL);

        let long = CatalogConfig::default().with_presign_ttl(Duration::from_secs(3600));
        assert_eq!(long.presign_ttl, MAX_PRESIGN_TTL);

        let ok = CatalogConfig::default().with_presign_ttl(Duration::from_secs(420));
        assert_eq!(ok.presign_ttl, Duration::from_secs(420));
    }
}
