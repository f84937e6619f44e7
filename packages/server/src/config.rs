use anyhow::{Context, Result};
use apidoc_extraction::{ParamStyle, DEFAULT_MAX_BODY_BYTES};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    /// Largest documentation page accepted, in bytes
    pub fetch_max_bytes: usize,
    /// Skip SSRF validation of `swaggerUrl` (local development only)
    pub allow_private_hosts: bool,
    pub options_variable: String,
    pub description_field: String,
    pub param_style: ParamStyle,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            fetch_timeout_secs: 30,
            fetch_user_agent: concat!("apidoc-extraction/", env!("CARGO_PKG_VERSION")).to_string(),
            fetch_max_bytes: DEFAULT_MAX_BODY_BYTES,
            allow_private_hosts: false,
            options_variable: "options".to_string(),
            description_field: "swaggerDoc".to_string(),
            param_style: ParamStyle::Placeholder,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            port: match lookup("PORT") {
                Some(port) => port.parse().context("PORT must be a valid number")?,
                None => defaults.port,
            },
            fetch_timeout_secs: match lookup("FETCH_TIMEOUT_SECS") {
                Some(secs) => secs
                    .parse()
                    .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
                None => defaults.fetch_timeout_secs,
            },
            fetch_user_agent: lookup("FETCH_USER_AGENT").unwrap_or(defaults.fetch_user_agent),
            fetch_max_bytes: match lookup("FETCH_MAX_BYTES") {
                Some(bytes) => bytes
                    .parse()
                    .context("FETCH_MAX_BYTES must be a whole number of bytes")?,
                None => defaults.fetch_max_bytes,
            },
            allow_private_hosts: lookup("ALLOW_PRIVATE_HOSTS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            options_variable: lookup("OPTIONS_VARIABLE").unwrap_or(defaults.options_variable),
            description_field: lookup("DESCRIPTION_FIELD").unwrap_or(defaults.description_field),
            param_style: match lookup("PARAM_STYLE") {
                Some(style) => style
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("PARAM_STYLE must be `placeholder` or `inferred`")?,
                None => defaults.param_style,
            },
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.fetch_max_bytes, 10 * 1024 * 1024);
        assert!(!config.allow_private_hosts);
        assert_eq!(config.options_variable, "options");
        assert_eq!(config.description_field, "swaggerDoc");
        assert_eq!(config.param_style, ParamStyle::Placeholder);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("FETCH_MAX_BYTES", "65536"),
            ("ALLOW_PRIVATE_HOSTS", "true"),
            ("PARAM_STYLE", "inferred"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173, https://app.example.com,"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.fetch_max_bytes, 65536);
        assert!(config.allow_private_hosts);
        assert_eq!(config.param_style, ParamStyle::Inferred);
        assert_eq!(
            config.cors_allowed_origins,
            ["http://localhost:5173", "https://app.example.com"]
        );
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("FETCH_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config_from(&[("FETCH_MAX_BYTES", "10MB")]).is_err());
        assert!(config_from(&[("PARAM_STYLE", "random")]).is_err());
    }
}
