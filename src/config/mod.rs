use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
    #[error("VISIT_LOG_CAPACITY must be a positive integer, got '{0}'")]
    InvalidCapacity(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_server: ServerConfig,
    pub visit_log: VisitLogConfig,
    pub geoip: GeoIpConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitLogConfig {
    /// Maximum number of retained visits
    /// If None, the log grows without bound
    pub capacity: Option<NonZeroUsize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// Path to a MaxMind country (or city) database used when requests
    /// carry no country header
    pub country_db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Path to directory containing static frontend files
    /// If None, uses embedded frontend
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = parse_port(
            &std::env::var("API_PORT").unwrap_or_else(|_| "8080".to_string()),
        )?;

        let capacity = parse_capacity(std::env::var("VISIT_LOG_CAPACITY").ok().as_deref())?;

        let country_db_path = non_empty_var("GEOIP_COUNTRY_DB_PATH");
        let frontend_static_dir = non_empty_var("FRONTEND_STATIC_DIR");

        Ok(Config {
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            visit_log: VisitLogConfig { capacity },
            geoip: GeoIpConfig { country_db_path },
            frontend: FrontendConfig {
                static_dir: frontend_static_dir,
            },
        })
    }

    /// Address to bind the HTTP listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_server.host, self.api_server.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

/// Unset or blank means unbounded
fn parse_capacity(value: Option<&str>) -> Result<Option<NonZeroUsize>, ConfigError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<NonZeroUsize>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidCapacity(raw.to_string())),
    }
}
