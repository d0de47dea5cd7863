//! Store Connection Configuration
//!
//! `StoreConfig` is the single source of truth for how the process reaches its
//! document store. It is built once at startup, either from a URI-style
//! address or from the environment, and handed to `SurrealStore::connect`.
//!
//! Supported addresses:
//!
//! - `mem://[database]` - embedded, in-memory (default)
//! - `rocksdb://<path>` - embedded, on disk
//! - `http://host:port[/database]` and `https://...` - remote server

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ADDRESS: &str = "mem://";
pub const DEFAULT_NAMESPACE: &str = "crossref";
pub const DEFAULT_DATABASE: &str = "circular";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_STORE_URI: &str = "CROSSREF_STORE_URI";
pub const ENV_STORE_USER: &str = "CROSSREF_STORE_USER";
pub const ENV_STORE_PASS: &str = "CROSSREF_STORE_PASS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CROSSREF_REQUEST_TIMEOUT_MS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Store address has no scheme: {0}")]
    MissingScheme(String),

    #[error("Unsupported store scheme {scheme:?} (expected mem, rocksdb, http or https)")]
    UnsupportedScheme { scheme: String },

    #[error("Store address is missing a host: {0}")]
    MissingHost(String),

    #[error("rocksdb address is missing a path: {0}")]
    MissingPath(String),

    #[error("Invalid request timeout {0:?}: expected whole milliseconds greater than zero")]
    InvalidTimeout(String),

    #[error("CROSSREF_STORE_USER and CROSSREF_STORE_PASS must be set together")]
    IncompleteCredentials,
}

/// Root credentials for a remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Everything needed to open one store connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Engine endpoint, without the database segment (`mem://`, `http://127.0.0.1:8000`)
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    /// Only used by remote endpoints
    pub credentials: Option<Credentials>,
    /// Deadline applied to every store round-trip
    pub request_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ADDRESS.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            credentials: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Embedded in-memory store with default settings
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Parse a URI-style store address
    pub fn from_uri(uri: &str) -> Result<Self, ConfigError> {
        let uri = uri.trim();
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| ConfigError::MissingScheme(uri.to_string()))?;

        let mut config = Self::default();
        match scheme {
            "mem" => {
                config.endpoint = DEFAULT_ADDRESS.to_string();
                if let Some(database) = non_empty(rest.trim_matches('/')) {
                    config.database = database;
                }
            }
            "rocksdb" => {
                if rest.is_empty() {
                    return Err(ConfigError::MissingPath(uri.to_string()));
                }
                config.endpoint = uri.to_string();
            }
            "http" | "https" => {
                let (host, database) = match rest.split_once('/') {
                    Some((host, path)) => (host, non_empty(path.trim_matches('/'))),
                    None => (rest, None),
                };
                if host.is_empty() {
                    return Err(ConfigError::MissingHost(uri.to_string()));
                }
                config.endpoint = format!("{scheme}://{host}");
                if let Some(database) = database {
                    config.database = database;
                }
            }
            other => {
                return Err(ConfigError::UnsupportedScheme {
                    scheme: other.to_string(),
                })
            }
        }
        Ok(config)
    }

    /// Build from `CROSSREF_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test fixtures)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup(ENV_STORE_URI).unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let mut config = Self::from_uri(&uri)?;

        config = match (lookup(ENV_STORE_USER), lookup(ENV_STORE_PASS)) {
            (Some(username), Some(password)) => config.with_credentials(username, password),
            (None, None) => config,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            let millis: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.request_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Whether the endpoint is served by a remote process
    pub fn is_remote(&self) -> bool {
        self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_mem_uri_uses_defaults() {
        let config = StoreConfig::from_uri("mem://").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(!config.is_remote());
    }

    #[test]
    fn test_mem_uri_with_database() {
        let config = StoreConfig::from_uri("mem://scratch").unwrap();
        assert_eq!(config.endpoint, "mem://");
        assert_eq!(config.database, "scratch");
    }

    #[test]
    fn test_http_uri_splits_database() {
        let config = StoreConfig::from_uri("http://localhost:8000/circular2").unwrap();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.database, "circular2");
        assert!(config.is_remote());
    }

    #[test]
    fn test_http_uri_without_database() {
        let config = StoreConfig::from_uri("http://127.0.0.1:8000").unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:8000");
        assert_eq!(config.database, DEFAULT_DATABASE);
    }

    #[test]
    fn test_rocksdb_uri_keeps_path() {
        let config = StoreConfig::from_uri("rocksdb:///tmp/crossref.db").unwrap();
        assert_eq!(config.endpoint, "rocksdb:///tmp/crossref.db");
        assert_eq!(
            StoreConfig::from_uri("rocksdb://"),
            Err(ConfigError::MissingPath("rocksdb://".to_string()))
        );
    }

    #[test]
    fn test_rejects_unsupported_and_malformed_addresses() {
        assert_eq!(
            StoreConfig::from_uri("mongodb://localhost:27017/circular"),
            Err(ConfigError::UnsupportedScheme {
                scheme: "mongodb".to_string()
            })
        );
        assert!(matches!(
            StoreConfig::from_uri("localhost:8000"),
            Err(ConfigError::MissingScheme(_))
        ));
        assert!(matches!(
            StoreConfig::from_uri("http:///circular"),
            Err(ConfigError::MissingHost(_))
        ));
    }

    #[test]
    fn test_lookup_defaults_to_in_memory() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::in_memory());
    }

    #[test]
    fn test_lookup_reads_credentials_and_timeout() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_STORE_URI, "http://db:8000/blog"),
            (ENV_STORE_USER, "root"),
            (ENV_STORE_PASS, "secret"),
            (ENV_REQUEST_TIMEOUT_MS, "2500"),
        ]))
        .unwrap();

        assert_eq!(config.database, "blog");
        assert_eq!(
            config.credentials,
            Some(Credentials {
                username: "root".to_string(),
                password: "secret".to_string()
            })
        );
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_builders_set_credentials_and_timeout() {
        let config = StoreConfig::from_uri("https://db.example.com/circular")
            .unwrap()
            .with_credentials("admin", "hunter2")
            .with_request_timeout(Duration::from_secs(3));

        assert!(config.is_remote());
        assert_eq!(
            config.credentials,
            Some(Credentials {
                username: "admin".to_string(),
                password: "hunter2".to_string()
            })
        );
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(!StoreConfig::in_memory().is_remote());
    }

    #[test]
    fn test_lookup_rejects_half_credentials_and_bad_timeout() {
        assert_eq!(
            StoreConfig::from_lookup(lookup(&[(ENV_STORE_USER, "root")])),
            Err(ConfigError::IncompleteCredentials)
        );
        assert_eq!(
            StoreConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_MS, "0")])),
            Err(ConfigError::InvalidTimeout("0".to_string()))
        );
    }
}
