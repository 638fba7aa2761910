//! SES (v2) outbound mail

use aws_config::SdkConfig;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use super::AwsError;

const CHARSET: &str = "UTF-8";

#[derive(Debug, Clone)]
pub struct SesClient {
    client: aws_sdk_sesv2::Client,
    source: String,
}

impl SesClient {
    pub fn new(sdk: &SdkConfig, source: impl Into<String>) -> Self {
        Self::from_conf(aws_sdk_sesv2::Config::from(sdk), source)
    }

    pub fn from_conf(config: aws_sdk_sesv2::Config, source: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_sesv2::Client::from_conf(config),
            source: source.into(),
        }
    }

    pub async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), AwsError> {
        let message = Message::builder()
            .subject(utf8(subject)?)
            .body(Body::builder().html(utf8(html)?).build())
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(&self.source)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| AwsError::request("SendEmail", e))?;

        tracing::debug!(message_id = ?output.message_id(), "Email handed to SES");
        Ok(())
    }
}

fn utf8(data: &str) -> Result<Content, AwsError> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| AwsError::request("SendEmail", e))
}
