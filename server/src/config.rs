//! Environment-based configuration, read once at startup.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Scheme and host used to build absolute links (short links, media,
    /// pagination), without a trailing slash.
    pub public_url: String,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse_var("BIND_ADDR", "0.0.0.0:3000")?;
        let session_ttl_days = parse_var("SESSION_TTL_DAYS", "30")?;

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database_url,
            bind_addr,
            public_url,
            session_ttl_days,
        })
    }

    /// Absolute URL of a stored image.
    pub fn media_url(&self, image_id: uuid::Uuid) -> String {
        format!("{}/media/{}", self.public_url, image_id)
    }

    pub fn short_link_url(&self, token: &str) -> String {
        format!("{}/s/{}/", self.public_url, token)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
