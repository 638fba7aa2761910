//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose `debug` output is enabled in the local environment
const WORKSPACE_CRATES: &[&str] = &["api", "auth", "catalog", "shop", "kernel", "platform"];

/// Filter directives for an environment name and a `LOG_LEVEL` value
pub fn filter_directives(env: &str, log_level: &str) -> String {
    if env == "local" {
        let mut directives: Vec<String> = WORKSPACE_CRATES
            .iter()
            .map(|krate| format!("{krate}=debug"))
            .collect();
        directives.push("tower_http=debug".to_string());
        directives.insert(0, log_level.to_string());
        directives.join(",")
    } else {
        log_level.to_string()
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level when set. `ENV=local` selects
/// the multi-line pretty formatter, everything else the compact one.
pub fn init(env: &str, log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(env, log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if env == "local" {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives() {
        assert_eq!(filter_directives("production", "warn"), "warn");

        let local = filter_directives("local", "info");
        assert!(local.starts_with("info,"));
        assert!(local.contains("shop=debug"));
        assert!(local.contains("tower_http=debug"));
    }
}
