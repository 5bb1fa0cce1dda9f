use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Which [`Storage`](crate::domain::ports::Storage) backend to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Memory,
}

impl FromStr for StorageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(StorageKind::Sqlite),
            "memory" => Ok(StorageKind::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub storage: StorageKind,
    pub host: String,
    pub port: u16,
    /// How often kitchen screens are told to re-fetch the board.
    pub kitchen_refresh: Duration,
    /// Idle time after which a login session expires.
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let kitchen_refresh_secs =
            positive("KITCHEN_REFRESH_SECS", get("KITCHEN_REFRESH_SECS", "5"))?;
        let session_idle_secs = positive("SESSION_IDLE_SECS", get("SESSION_IDLE_SECS", "1800"))?;

        Ok(Self {
            database_url: get("DATABASE_URL", "restaurant.db"),
            storage: parse("STORAGE", get("STORAGE", "sqlite"))?,
            host: get("HOST", "0.0.0.0"),
            port: parse("PORT", get("PORT", "8080"))?,
            kitchen_refresh: Duration::from_secs(kitchen_refresh_secs),
            session_idle: Duration::from_secs(session_idle_secs),
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn positive(key: &'static str, value: String) -> Result<u64, ConfigError> {
    match parse::<u64>(key, value)? {
        0 => Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
        }),
        secs => Ok(secs),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();

        assert_eq!(config.database_url, "restaurant.db");
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.kitchen_refresh, Duration::from_secs(5));
        assert_eq!(config.session_idle, Duration::from_secs(1800));
    }

    #[test]
    fn values_override_defaults() {
        let config = load(&[
            ("DATABASE_URL", "/tmp/orders.db"),
            ("STORAGE", "memory"),
            ("PORT", "9000"),
            ("KITCHEN_REFRESH_SECS", "2"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "/tmp/orders.db");
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.port, 9000);
        assert_eq!(config.kitchen_refresh, Duration::from_secs(2));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert_eq!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            })
        );
    }

    #[test]
    fn unknown_storage_and_zero_refresh_are_rejected() {
        assert!(load(&[("STORAGE", "postgres")]).is_err());
        assert!(load(&[("KITCHEN_REFRESH_SECS", "0")]).is_err());
        assert!(load(&[("SESSION_IDLE_SECS", "0")]).is_err());
    }
}
