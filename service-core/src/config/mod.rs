//! Common configuration shared by the leadform workspace services.
//!
//! Covers only what every service needs (the listen port); service-specific
//! settings such as MongoDB, provider keys and tuning live in each service's
//! own config module and flatten this struct in.

use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// HTTP listen port. `APP__PORT` overrides; defaults to 8080.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from an optional `configuration` file plus `APP`-prefixed
    /// environment variables, reading `.env` first when present.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_when_absent() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.port, 8080);
    }
}
