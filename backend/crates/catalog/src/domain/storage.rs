//! Object storage port

use std::time::Duration;

use kernel::error::app_error::AppResult;

#[trait_variant::make(ObjectStorage: Send)]
pub trait LocalObjectStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Time-limited GET link to one object
    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String>;
}
