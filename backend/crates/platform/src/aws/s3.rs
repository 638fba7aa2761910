//! S3 object operations

use std::time::Duration;

use aws_config::SdkConfig;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;

use super::AwsError;

#[derive(Debug, Clone)]
pub struct S3Client {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Client {
    /// A custom endpoint switches to path-style addressing
    pub fn new(sdk: &SdkConfig, bucket: impl Into<String>) -> Self {
        let config = aws_sdk_s3::config::Builder::from(sdk)
            .force_path_style(sdk.endpoint_url().is_some())
            .build();
        Self::from_conf(config, bucket)
    }

    pub fn from_conf(config: aws_sdk_s3::Config, bucket: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Presigned GET URL valid for `ttl`
    pub async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, AwsError> {
        let presigning =
            PresigningConfig::expires_in(ttl).map_err(|e| AwsError::Presigning(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AwsError::request("GetObject presigning", e))?;

        Ok(request.uri().to_string())
    }

    pub async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AwsError> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| AwsError::request("PutObject", e))?;

        tracing::debug!(bucket = %self.bucket, key, size, "Object uploaded");
        Ok(())
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), AwsError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AwsError::request("DeleteObject", e))?;

        tracing::debug!(bucket = %self.bucket, key, "Object deleted");
        Ok(())
    }
}
