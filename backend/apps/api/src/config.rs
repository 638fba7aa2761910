//! Application configuration
//!
//! Read once at startup from the process environment (after `.env` has been
//! loaded). [`AppConfig::from_lookup`] takes any lookup function so that the
//! parsing rules can be tested without touching the real environment.

use std::str::FromStr;
use std::time::Duration;

use auth::AuthConfig;
use catalog::CatalogConfig;
use shop::ShopConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Credentials are not part of it: the SDK resolves them through its
/// default provider chain.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub s3_bucket: String,
    pub ses_source_email: String,
    /// S3/SES-compatible endpoint; switches S3 to path-style addressing
    pub endpoint_url: Option<String>,
}

#[derive(Clone)]
pub struct StripeConfig {
    pub api_key: String,
    pub webhook_secret: String,
    pub currency: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// `local` enables verbose logs
    pub env: String,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    /// `None` issues tokens without expiry
    pub jwt_ttl: Option<Duration>,
    pub bcrypt_cost: u32,
    pub aws: AwsConfig,
    pub stripe: StripeConfig,
    pub presign_ttl: Duration,
    pub request_timeout: Duration,
    /// `None` allows any origin
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("jwt_ttl", &self.jwt_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("aws", &self.aws)
            .field("stripe", &self.stripe)
            .field("presign_ttl", &self.presign_ttl)
            .field("request_timeout", &self.request_timeout)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Read from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let jwt_ttl = match vars.parse_or("JWT_TTL_SECS", 24 * 3600u64)? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            port: vars.parse_or("PORT", 8080)?,
            env: vars.optional("ENV").unwrap_or_else(|| "production".to_string()),
            log_level: vars.optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            database: DatabaseConfig {
                url: database_url(&vars)?,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            jwt_secret: vars.required("JWT_SECRET")?,
            jwt_ttl,
            bcrypt_cost: vars.parse_or("BCRYPT_COST", 12)?,
            aws: AwsConfig {
                region: vars.required("AWS_REGION")?,
                s3_bucket: vars.required("AWS_S3_BUCKET")?,
                ses_source_email: vars.required("AWS_SES_SOURCE_EMAIL")?,
                endpoint_url: vars.optional("AWS_ENDPOINT_URL"),
            },
            stripe: StripeConfig {
                api_key: vars.required("STRIPE_API_KEY")?,
                webhook_secret: vars.required("STRIPE_WEBHOOK_SECRET")?,
                currency: vars
                    .optional("STRIPE_CURRENCY")
                    .unwrap_or_else(|| "usd".to_string()),
            },
            presign_ttl: Duration::from_secs(vars.parse_or("PRESIGN_TTL_SECS", 600)?),
            request_timeout: Duration::from_secs(vars.parse_or("REQUEST_TIMEOUT_SECS", 30)?),
            cors_allowed_origins: vars.optional("CORS_ALLOWED_ORIGINS").map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            }),
        })
    }
}

impl AppConfig {
    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            jwt_ttl: self.jwt_ttl,
            bcrypt_cost: self.bcrypt_cost,
            ..AuthConfig::with_secret(self.jwt_secret.as_bytes())
        }
    }

    /// Presigned links are clamped to the catalog's allowed window
    pub fn catalog(&self) -> CatalogConfig {
        CatalogConfig::default().with_presign_ttl(self.presign_ttl)
    }

    pub fn shop(&self) -> ShopConfig {
        ShopConfig::default().with_download_ttl(self.presign_ttl)
    }
}

/// `DATABASE_URL`, or one composed from the `POSTGRES_*` parts
fn database_url(vars: &Vars<'_>) -> Result<String, ConfigError> {
    if let Some(url) = vars.optional("DATABASE_URL") {
        return Ok(url);
    }

    let host = vars.required("POSTGRES_HOST")?;
    let port: u16 = vars.parse_or("POSTGRES_PORT", 5432)?;
    let user = vars.required("POSTGRES_USERNAME")?;
    let password = vars.required("POSTGRES_PASSWORD")?;
    let database = vars.required("POSTGRES_DATABASE")?;

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        percent_encode(&user),
        percent_encode(&password),
        host,
        port,
        database
    ))
}

/// Userinfo encoding for the composed connection string
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Present and not blank
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::application::config::MAX_PRESIGN_TTL;
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "postgres://u:p@localhost/db"),
            ("JWT_SECRET", "secret"),
            ("AWS_REGION", "us-east-1"),
            ("AWS_S3_BUCKET", "books"),
            ("AWS_SES_SOURCE_EMAIL", "noreply@example.com"),
            ("STRIPE_API_KEY", "sk_test"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_test"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.env, "production");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt_ttl, Some(Duration::from_secs(86_400)));
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.stripe.currency, "usd");
        assert_eq!(config.presign_ttl, Duration::from_secs(600));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.cors_allowed_origins.is_none());
        assert!(config.aws.endpoint_url.is_none());
    }

    #[test]
    fn test_context_configs() {
        let mut vars = base();
        vars.insert("PRESIGN_TTL_SECS", "3600");
        vars.insert("BCRYPT_COST", "4");
        let config = load(&vars).unwrap();

        let auth = config.auth();
        assert_eq!(auth.jwt_secret, b"secret".to_vec());
        assert_eq!(auth.bcrypt_cost, 4);
        assert_eq!(auth.reset_password_length, 8);

        assert_eq!(config.catalog().presign_ttl, MAX_PRESIGN_TTL);
        assert_eq!(config.shop().download_ttl, MAX_PRESIGN_TTL);
    }

    #[test]
    fn test_missing_required_variable_is_named() {
        let mut vars = base();
        vars.remove("STRIPE_WEBHOOK_SECRET");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Missing("STRIPE_WEBHOOK_SECRET")
        );
    }

    #[test]
    fn test_database_url_from_parts() {
        let mut vars = base();
        vars.remove("DATABASE_URL");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Missing("POSTGRES_HOST")
        );

        vars.insert("POSTGRES_HOST", "db");
        vars.insert("POSTGRES_USERNAME", "shop");
        vars.insert("POSTGRES_PASSWORD", "p@ss word");
        vars.insert("POSTGRES_DATABASE", "books");
        let config = load(&vars).unwrap();
        assert_eq!(
            config.database.url,
            "postgres://shop:p%40ss%20word@db:5432/books"
        );
    }

    #[test]
    fn test_invalid_number() {
        let mut vars = base();
        vars.insert("PORT", "eighty");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "PORT", .. }
        ));
    }

    #[test]
    fn test_zero_ttl_disables_expiry_and_origins_split() {
        let mut vars = base();
        vars.insert("JWT_TTL_SECS", "0");
        vars.insert("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,");
        let config = load(&vars).unwrap();
        assert_eq!(config.jwt_ttl, None);
        assert_eq!(
            config.cors_allowed_origins.unwrap(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
