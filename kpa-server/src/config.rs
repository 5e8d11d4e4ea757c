use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::DEFAULT_PAGE_LIMIT;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DATABASE_PATH: &str = "kpa_forms.db";
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub log_json: bool,
    pub seed_demo_data: bool,
    pub default_page_limit: u32,
}

fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    raw.and_then(|v| match v {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    })
    .unwrap_or(default)
}

fn parse_value<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes `env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_addr: SocketAddr = DEFAULT_BIND_ADDR
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "KPA_BIND_ADDR",
                value: DEFAULT_BIND_ADDR.to_string(),
            })?;

        Ok(Config {
            bind_addr: parse_value("KPA_BIND_ADDR", lookup("KPA_BIND_ADDR"), default_addr)?,
            database_path: lookup("KPA_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            log_json: parse_bool(lookup("KPA_LOG_JSON").as_deref(), false),
            seed_demo_data: parse_bool(lookup("KPA_SEED_DEMO_DATA").as_deref(), false),
            default_page_limit: parse_value(
                "KPA_DEFAULT_PAGE_LIMIT",
                lookup("KPA_DEFAULT_PAGE_LIMIT"),
                DEFAULT_PAGE_LIMIT,
            )?,
        })
    }

    pub fn in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_DATABASE
    }
}
