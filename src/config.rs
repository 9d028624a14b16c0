//! Process configuration read from the environment (after `dotenvy` has loaded `.env`).

use crate::error::ConfigError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_DATABASE_URL: &str = "sqlite://records.db?mode=rwc";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    /// Reject emails that are not syntactically valid addresses. When off, any non-empty string is stored.
    pub strict_email: bool,
    /// Upper bound applied to the `limit` query parameter of list endpoints.
    pub max_page_size: u32,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            max_connections: 5,
            strict_email: true,
            max_page_size: 1000,
            body_limit: 64 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: parse_or(&lookup, "HOST", defaults.host)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            strict_email: parse_bool_or(&lookup, "STRICT_EMAIL", defaults.strict_email)?,
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", defaults.max_page_size)?,
            body_limit: parse_or(&lookup, "BODY_LIMIT_BYTES", defaults.body_limit)?,
        };
        if config.max_connections == 0 {
            return Err(ConfigError::TooSmall {
                key: "DB_MAX_CONNECTIONS",
                min: 1,
            });
        }
        if config.max_page_size == 0 {
            return Err(ConfigError::TooSmall {
                key: "MAX_PAGE_SIZE",
                min: 1,
            });
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
