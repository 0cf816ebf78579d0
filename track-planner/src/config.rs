//! Server configuration from the environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tracing::warn;

use crate::cache::CacheConfig;

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on (`PORT`).
    pub port: u16,

    /// Directory holding the timetable files (`DATA_DIR`).
    pub data_dir: PathBuf,

    /// Directory for persisted schedules (`CACHE_DIR`); empty disables
    /// persistence.
    pub cache_dir: Option<PathBuf>,

    /// In-memory schedule cache capacity (`CACHE_CAPACITY`).
    pub cache_capacity: u64,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = parse_or(&lookup, "PORT", defaults.port);
        let cache_capacity = parse_or(&lookup, "CACHE_CAPACITY", defaults.cache_capacity);
        let data_dir = lookup("DATA_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let cache_dir = match lookup("CACHE_DIR") {
            Some(v) if v.is_empty() => None,
            Some(v) => Some(PathBuf::from(v)),
            None => defaults.cache_dir,
        };

        Self {
            port,
            data_dir,
            cache_dir,
            cache_capacity,
        }
    }

    /// Address to bind, on all interfaces.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn cache_config(&self) -> CacheConfig {
        let config = CacheConfig::default().with_max_capacity(self.cache_capacity);
        match &self.cache_dir {
            Some(dir) => config.with_dir(dir),
            None => config,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("./data"),
            cache_dir: Some(PathBuf::from("./cache")),
            cache_capacity: 1000,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparsable setting");
            default
        }),
    }
}
