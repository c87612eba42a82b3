//! Console configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::repository::{
    Backend, MemoryRepository, RepositoryError, SupabaseClient, SupabaseConfig,
};

/// Default address to serve on.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors from reading the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(String);

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Which stations table to talk to.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    /// A Supabase project.
    Supabase { url: String, api_key: String },
    /// The in-process table, optionally seeded from a JSON file.
    Memory { seed_file: Option<PathBuf> },
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendConfig,
    pub cache_ttl: Duration,
    pub request_timeout_secs: u64,
    pub static_dir: String,
}

impl ConsoleConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_ANON_KEY")) {
            (Some(url), Some(api_key)) => BackendConfig::Supabase { url, api_key },
            (None, None) => BackendConfig::Memory {
                seed_file: non_empty("STATIONS_SEED_FILE").map(PathBuf::from),
            },
            (Some(_), None) => {
                return Err(ConfigError::new(
                    "SUPABASE_ANON_KEY is required when SUPABASE_URL is set",
                ));
            }
            (None, Some(_)) => {
                return Err(ConfigError::new(
                    "SUPABASE_URL is required when SUPABASE_ANON_KEY is set",
                ));
            }
        };

        let bind_addr = non_empty("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::new("BIND_ADDR must be a socket address"))?;

        Ok(Self {
            bind_addr,
            backend,
            cache_ttl: Duration::from_secs(parse_or_default(
                &non_empty,
                "STATION_CACHE_TTL_SECS",
                300_u64,
            )?),
            request_timeout_secs: parse_or_default(&non_empty, "REQUEST_TIMEOUT_SECS", 30_u64)?,
            static_dir: non_empty("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        })
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().with_ttl(self.cache_ttl)
    }

    /// Build the configured repository.
    pub fn build_backend(&self) -> Result<Backend, RepositoryError> {
        match &self.backend {
            BackendConfig::Supabase { url, api_key } => {
                let config =
                    SupabaseConfig::new(url, api_key).with_timeout(self.request_timeout_secs);
                Ok(Backend::Supabase(SupabaseClient::new(config)?))
            }
            BackendConfig::Memory { seed_file: Some(path) } => {
                Ok(Backend::Memory(MemoryRepository::from_file(path)?))
            }
            BackendConfig::Memory { seed_file: None } => {
                Ok(Backend::Memory(MemoryRepository::new()))
            }
        }
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::new(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(
        pairs: &'static [(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_to_empty_memory_backend() {
        let config = ConsoleConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.backend, BackendConfig::Memory { seed_file: None });
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn supabase_needs_url_and_key() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_ANON_KEY", " anon "),
        ]))
        .unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::Supabase {
                url: "https://example.supabase.co".into(),
                api_key: "anon".into(),
            }
        );

        let err = ConsoleConfig::from_lookup(lookup_from(&[(
            "SUPABASE_URL",
            "https://example.supabase.co",
        )]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: SUPABASE_ANON_KEY is required when SUPABASE_URL is set"
        );

        let err =
            ConsoleConfig::from_lookup(lookup_from(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
        assert!(err.to_string().contains("SUPABASE_URL is required"));
    }

    #[test]
    fn seed_file_selects_memory_backend() {
        let config =
            ConsoleConfig::from_lookup(lookup_from(&[("STATIONS_SEED_FILE", "data/stations.json")]))
                .unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::Memory {
                seed_file: Some(PathBuf::from("data/stations.json"))
            }
        );
    }

    #[test]
    fn rejects_invalid_numbers_and_addresses() {
        let err = ConsoleConfig::from_lookup(lookup_from(&[("STATION_CACHE_TTL_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: STATION_CACHE_TTL_SECS must be a valid number"
        );

        let err =
            ConsoleConfig::from_lookup(lookup_from(&[("BIND_ADDR", "localhost")])).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("STATION_CACHE_TTL_SECS", "5"),
            ("REQUEST_TIMEOUT_SECS", "10"),
            ("STATIC_DIR", "/srv/static"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cache_config().ttl, Duration::from_secs(5));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.static_dir, "/srv/static");
    }

    #[test]
    fn builds_memory_backend_from_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "[]").unwrap();

        let config = ConsoleConfig {
            bind_addr: DEFAULT_BIND_ADDR.parse().unwrap(),
            backend: BackendConfig::Memory {
                seed_file: Some(path),
            },
            cache_ttl: Duration::from_secs(1),
            request_timeout_secs: 1,
            static_dir: "static".into(),
        };

        let backend = config.build_backend().unwrap();
        assert_eq!(backend.describe(), "memory");
    }
}
