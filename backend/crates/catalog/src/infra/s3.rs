//! [`ObjectStorage`] over the S3 client of `platform`

use std::time::Duration;

use kernel::error::app_error::{AppResult, ResultExt};
use platform::aws::S3Client;

use crate::domain::storage::ObjectStorage;

#[derive(Debug, Clone)]
pub struct S3ObjectStorage {
    client: S3Client,
}

impl S3ObjectStorage {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

impl ObjectStorage for S3ObjectStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        self.client
            .put_object(key, bytes, content_type)
            .await
            .or_internal("object upload failed")
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object(key)
            .await
            .or_internal("object deletion failed")
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.client
            .presign_get(key, ttl)
            .await
            .or_internal("object link presigning failed")
    }
}
