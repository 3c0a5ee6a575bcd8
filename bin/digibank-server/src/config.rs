//! Configuration management for the digital bank server.
//!
//! This module provides configuration loading from both base configuration file
//! and environment variables. Environment variables override the base configuration
//! and use the prefix `DIGIBANK_`.

use core::time::Duration;

use std::path::PathBuf;

use config::{ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Loads the application configuration from base config and environment variables.
///
/// Environment variables use double underscores `__` to denote nested keys.
/// For example, `DIGIBANK_AUTH__TOKEN_SECRET` corresponds to `auth.token_secret`.
///
/// # Errors
///
/// If the configuration could not be loaded or parsed
pub fn get_configuration() -> Result<Config, ConfigError> {
    config::Config::builder()
        .add_source(File::from_str(include_str!("base_config.ron"), FileFormat::Ron))
        .add_source(
            Environment::with_prefix(Config::CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("app.cors_allowed_origins"),
        )
        .build()?
        .try_deserialize()
}

/// Root configuration structure containing all application settings.
#[derive(Deserialize)]
pub struct Config {
    /// Application-specific configuration
    pub app: AppConfig,

    /// Record store configuration
    pub store: StoreConfig,

    /// Bearer token configuration
    pub auth: AuthConfig,
}

/// Application-specific configuration settings.
#[derive(Deserialize)]
pub struct AppConfig {
    /// The address to listen on (e.g., "0.0.0.0:5000")
    pub listen: String,

    /// CORS allowed origins (e.g., ["http://localhost:3000", "https://example.com"])
    /// Use ["*"] to allow all origins
    pub cors_allowed_origins: Vec<String>,
}

/// Record store configuration settings.
#[derive(Deserialize)]
pub struct StoreConfig {
    /// Directory holding `clients.json`, `accounts.json` and `transactions.json`
    pub data_dir: PathBuf,
}

/// Bearer token configuration settings.
#[derive(Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens
    pub token_secret: String,

    /// How long an issued token stays valid
    #[serde(with = "humantime_serde")]
    pub token_ttl: Duration,
}

impl Config {
    const CONFIG_ENV_PREFIX: &str = "DIGIBANK";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_configuration_parses() {
        let config = get_configuration().unwrap();

        assert_eq!(config.app.cors_allowed_origins, vec!["*".to_owned()]);
        assert_eq!(config.auth.token_ttl, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(config.store.data_dir, PathBuf::from("./data"));
    }
}
