//! Environment configuration.

use std::{net::SocketAddr, str::FromStr};

use sqlx::mysql::MySqlConnectOptions;
use thiserror::Error;

const DEFAULT_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 3306;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("{0} is not set in env")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where to reach the database. The schema must already exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DatabaseConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) name: String,
}

impl DatabaseConfig {
    pub(crate) fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    /// Address the HTTP server listens on.
    pub(crate) addr: SocketAddr,
    pub(crate) database: DatabaseConfig,
}

impl Config {
    /// Reads `ADDR` and the `DB_*` variables from the process environment.
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            addr: parse_or(&lookup, "ADDR", DEFAULT_ADDR.parse().ok())?,
            database: DatabaseConfig {
                host: lookup("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_owned()),
                port: parse_or(&lookup, "DB_PORT", Some(DEFAULT_DB_PORT))?,
                user: required("DB_USER")?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                name: required("DB_NAME")?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => match value.parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
        None => default.ok_or(ConfigError::Missing(key)),
    }
}
