use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::services::checkout::DEFAULT_CHECKOUT_TTL;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_STORAGE_DIR: &str = "./data";
const DEFAULT_PAYMENT_SUCCESS_RATE: f64 = 0.9;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
    Postgres(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub payment_success_rate: f64,
    pub simulate_latency: bool,
    pub seed_sample_data: bool,
    /// How long an untouched checkout is kept before it expires.
    pub checkout_ttl: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "file".to_string());
        let storage = match backend.to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File(PathBuf::from(
                lookup("STORAGE_DIR").unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string()),
            )),
            "postgres" => StorageBackend::Postgres(
                lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            ),
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "STORAGE_BACKEND",
                    value: backend,
                })
            }
        };

        let payment_success_rate = match lookup("PAYMENT_SUCCESS_RATE") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(rate) if (0.0..=1.0).contains(&rate) => rate,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "PAYMENT_SUCCESS_RATE",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_PAYMENT_SUCCESS_RATE,
        };

        let simulate_latency = parse_flag(&lookup, "SIMULATE_LATENCY", false)?;
        let seed_sample_data = parse_flag(&lookup, "SEED_SAMPLE_DATA", true)?;

        let checkout_ttl = match lookup("CHECKOUT_TTL_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "CHECKOUT_TTL_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_CHECKOUT_TTL,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = lookup("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            storage,
            payment_success_rate,
            simulate_latency,
            seed_sample_data,
            checkout_ttl,
            cors_allowed_origins,
            production,
        })
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
    }
}
