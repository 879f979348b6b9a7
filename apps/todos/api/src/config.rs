//! Configuration for the Todos API

use domain_todos::{OrderingPolicy, TaskOrdering};
use std::env;
use std::fmt::Display;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env_or_default("APP_ENV", "development");

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse `key` into `T`, falling back to `default` when unset.
fn env_parse<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_or_default(key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}

/// HTTP listen address
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("PORT", "8080")?;

        Ok(Self { host, port })
    }
}

/// How task lists behave
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TasksConfig {
    pub ordering: TaskOrdering,
    pub guest_window_months: u32,
}

impl FromEnv for TasksConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let guest: OrderingPolicy = env_parse("GUEST_TASK_ORDERING", "completion_first")?;
        let owner: OrderingPolicy = env_parse("OWNER_TASK_ORDERING", "completion_first")?;
        let guest_window_months = env_parse("GUEST_WINDOW_MONTHS", "1")?;

        Ok(Self {
            ordering: TaskOrdering::new(guest, owner),
            guest_window_months,
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    /// PostgreSQL connection string; tasks live in memory when absent
    pub database_url: Option<String>,
    pub tasks: TasksConfig,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        // Production never falls back to in-memory storage
        let database_url = if environment.is_production() {
            Some(env_required("DATABASE_URL")?)
        } else {
            env_required("DATABASE_URL").ok()
        };

        Ok(Self {
            environment,
            server: ServerConfig::from_env()?,
            database_url,
            tasks: TasksConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 8] = [
        "APP_ENV",
        "HOST",
        "PORT",
        "DATABASE_URL",
        "GUEST_TASK_ORDERING",
        "OWNER_TASK_ORDERING",
        "GUEST_WINDOW_MONTHS",
        "RUST_LOG",
    ];

    fn with_vars(overrides: &[(&str, &str)], f: impl FnOnce()) {
        let vars: Vec<(&str, Option<&str>)> = ALL_VARS
            .iter()
            .map(|key| {
                let value = overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_defaults() {
        with_vars(&[], || {
            let config = Config::from_env().unwrap();

            assert_eq!(config.environment, Environment::Development);
            assert_eq!(config.server.address(), "0.0.0.0:8080");
            assert!(config.database_url.is_none());
            assert_eq!(config.tasks.ordering, TaskOrdering::default());
            assert_eq!(config.tasks.guest_window_months, 1);
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            assert_eq!(Environment::from_env(), Environment::Production);
        });
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_custom_values() {
        with_vars(
            &[
                ("HOST", "127.0.0.1"),
                ("PORT", "3000"),
                ("DATABASE_URL", "postgres://localhost/todos"),
                ("OWNER_TASK_ORDERING", "recency_first"),
                ("GUEST_WINDOW_MONTHS", "6"),
            ],
            || {
                let config = Config::from_env().unwrap();

                assert_eq!(config.server.address(), "127.0.0.1:3000");
                assert_eq!(
                    config.database_url.as_deref(),
                    Some("postgres://localhost/todos")
                );
                assert_eq!(config.tasks.ordering.guest, OrderingPolicy::CompletionFirst);
                assert_eq!(config.tasks.ordering.owner, OrderingPolicy::RecencyFirst);
                assert_eq!(config.tasks.guest_window_months, 6);
            },
        );
    }

    #[test]
    fn test_invalid_port_is_parse_error() {
        with_vars(&[("PORT", "eighty")], || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "PORT"));
        });
    }

    #[test]
    fn test_unknown_ordering_is_parse_error() {
        with_vars(&[("GUEST_TASK_ORDERING", "alphabetical")], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("GUEST_TASK_ORDERING"));
        });
    }

    #[test]
    fn test_production_requires_database_url() {
        with_vars(&[("APP_ENV", "production")], || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DATABASE_URL"));
        });
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        with_vars(&[("DATABASE_URL", "  ")], || {
            let config = Config::from_env().unwrap();
            assert!(config.database_url.is_none());
        });
    }
}
