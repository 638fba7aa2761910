//! AWS clients
//!
//! Thin wrappers over the official SDK clients, limited to the calls the
//! store needs. Credentials come from the SDK's default provider chain
//! (environment, profile, web identity, ECS/EC2 roles).

pub mod s3;
pub mod ses;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use thiserror::Error;

pub use s3::S3Client;
pub use ses::SesClient;

#[derive(Debug, Error)]
pub enum AwsError {
    #[error("{operation} failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },

    #[error("invalid presigning configuration: {0}")]
    Presigning(String),
}

impl AwsError {
    /// Keep the whole SDK error context; its `Display` alone is terse
    pub(crate) fn request<E>(operation: &'static str, err: E) -> Self
    where
        E: std::error::Error,
    {
        Self::Request {
            operation,
            message: aws_sdk_s3::error::DisplayErrorContext(err).to_string(),
        }
    }
}

/// Shared SDK configuration for every AWS client
///
/// `endpoint_url` points all services at an S3/SES-compatible endpoint
/// (LocalStack, MinIO, ...).
pub async fn load_sdk_config(region: &str, endpoint_url: Option<&str>) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
    if let Some(url) = endpoint_url {
        loader = loader.endpoint_url(url);
    }
    let config = loader.load().await;

    tracing::debug!(region, endpoint_url, "AWS configuration loaded");
    config
}
