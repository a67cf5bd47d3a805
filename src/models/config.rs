//! Configuration model loaded from external sources.

use std::env;
use std::time::Duration;

use config::{Config, ConfigError};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers and the console.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Signs the flash message cookies; at least 64 bytes.
    pub secret: String,
    /// Origin of the remote actor service, without the `/api/v1` prefix.
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_search_debounce_ms() -> u64 {
    500
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Reads `config/default.yaml`, the `config/{APP_ENV}.yaml` overrides and
    /// `APP_*` environment variables, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        // Select config profile (defaults to `local`).
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_settings_fall_back_to_defaults() {
        let config: ServerConfig = Config::builder()
            .set_override("address", "127.0.0.1")
            .and_then(|b| b.set_override("port", 8080))
            .and_then(|b| b.set_override("templates_dir", "templates/**/*"))
            .and_then(|b| b.set_override("secret", "s"))
            .and_then(|b| b.set_override("api_base_url", "https://actors.example.com"))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
    }
}
