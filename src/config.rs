use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::completion::{client::DEFAULT_ENDPOINT, CompletionConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_pool_size: usize,
    /// Add `Secure` to the session cookie
    pub secure_cookies: bool,
    /// Lifetime of a login session
    pub session_ttl: Duration,
    pub completion: CompletionConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let timeout_secs: u64 = parse("COMPLETION_TIMEOUT_SECS", var("COMPLETION_TIMEOUT_SECS", "120"))?;

        let session_ttl_secs: u64 = parse("SESSION_TTL_SECS", var("SESSION_TTL_SECS", "604800"))?;

        let app_title = var("APP_TITLE", "RouterChat");
        let app_title = if app_title.trim().is_empty() {
            "RouterChat".to_string()
        } else {
            app_title
        };

        Ok(Self {
            database_url,
            bind_addr: parse("BIND_ADDR", var("BIND_ADDR", "127.0.0.1:5000"))?,
            db_pool_size: parse("DB_POOL_SIZE", var("DB_POOL_SIZE", "16"))?,
            secure_cookies: parse_bool("SECURE_COOKIES", var("SECURE_COOKIES", "false"))?,
            session_ttl: Duration::from_secs(session_ttl_secs),
            completion: CompletionConfig {
                endpoint: var("OPENROUTER_URL", DEFAULT_ENDPOINT),
                api_key: var("OPENROUTER_API_KEY", ""),
                site_url: var("SITE_URL", "http://localhost:5000"),
                app_title,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn app_title(&self) -> &str {
        &self.completion.app_title
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://u:p@localhost/chat")]).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.db_pool_size, 16);
        assert!(!config.secure_cookies);
        assert_eq!(config.session_ttl, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(config.completion.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.completion.site_url, "http://localhost:5000");
        assert_eq!(config.app_title(), "RouterChat");
        assert_eq!(config.completion.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://u:p@localhost/chat"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("APP_TITLE", "Team Chat"),
            ("SECURE_COOKIES", "true"),
            ("COMPLETION_TIMEOUT_SECS", "30"),
            ("SESSION_TTL_SECS", "3600"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.completion.api_key, "sk-or-test");
        assert_eq!(config.app_title(), "Team Chat");
        assert!(config.secure_cookies);
        assert_eq!(config.completion.timeout, Duration::from_secs(30));
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_blank_app_title_falls_back() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://u:p@localhost/chat"),
            ("APP_TITLE", "  "),
        ])
        .unwrap();
        assert_eq!(config.app_title(), "RouterChat");
    }

    #[test]
    fn test_missing_database_url() {
        assert!(matches!(
            config_from(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://u:p@localhost/chat"),
            ("DB_POOL_SIZE", "lots"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("DB_POOL_SIZE"));

        assert!(config_from(&[
            ("DATABASE_URL", "postgres://u:p@localhost/chat"),
            ("SECURE_COOKIES", "maybe"),
        ])
        .is_err());
    }
}
