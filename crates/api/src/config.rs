use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use pm_db::DbConfig;
use sqlx::postgres::PgSslMode;

/// A configuration variable holds a value that cannot be used.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Deployment environment. Destructive schema operations are refused in
/// [`AppEnv::Production`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Test,
    Production,
}

impl AppEnv {
    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

impl FromStr for AppEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "test" => Ok(AppEnv::Test),
            "production" | "prod" => Ok(AppEnv::Production),
            _ => Err("expected development, test or production".to_string()),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGIN`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `10`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests on shutdown (default: `10`).
    pub shutdown_timeout_secs: u64,
    pub app_env: AppEnv,
    /// Drop and recreate all tables at startup. Refused in production.
    pub reset_schema: bool,
    pub database: DbConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `SERVER_HOST`             | `0.0.0.0`               |
    /// | `SERVER_PORT`             | `8080`                  |
    /// | `CORS_ORIGIN`             | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`    | `10`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `10`                    |
    /// | `APP_ENV`                 | `development`           |
    /// | `RESET_SCHEMA`            | `false`                 |
    /// | `DB_USER`                 | `pmuser`                |
    /// | `DB_PASSWORD`             | `pmpassword`            |
    /// | `DB_HOST`                 | `localhost`             |
    /// | `DB_PORT`                 | `5432`                  |
    /// | `DB_NAME`                 | `project_manager`       |
    /// | `DB_SSLMODE`              | `disable`               |
    /// | `DB_MAX_CONNECTIONS`      | `10`                    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins: Vec<String> = get("CORS_ORIGIN", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            // `allow_credentials` rules out the wildcard.
            if origin == "*" {
                return Err(ConfigError {
                    key: "CORS_ORIGIN",
                    value: origin.clone(),
                    reason: "wildcard origin cannot be combined with credentials".to_string(),
                });
            }
            if let Err(e) = HeaderValue::from_str(origin) {
                return Err(ConfigError {
                    key: "CORS_ORIGIN",
                    value: origin.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let database = DbConfig {
            user: get("DB_USER", "pmuser"),
            password: get("DB_PASSWORD", "pmpassword"),
            host: get("DB_HOST", "localhost"),
            port: parse("DB_PORT", get("DB_PORT", "5432"))?,
            name: get("DB_NAME", "project_manager"),
            ssl_mode: parse::<PgSslMode>("DB_SSLMODE", get("DB_SSLMODE", "disable"))?,
            max_connections: parse("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS", "10"))?,
            acquire_timeout: Duration::from_secs(parse(
                "DB_ACQUIRE_TIMEOUT_SECS",
                get("DB_ACQUIRE_TIMEOUT_SECS", "5"),
            )?),
        };

        Ok(Self {
            host: get("SERVER_HOST", "0.0.0.0"),
            port: parse("SERVER_PORT", get("SERVER_PORT", "8080"))?,
            cors_origins,
            request_timeout_secs: parse("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS", "10"))?,
            shutdown_timeout_secs: parse(
                "SHUTDOWN_TIMEOUT_SECS",
                get("SHUTDOWN_TIMEOUT_SECS", "10"),
            )?,
            app_env: parse("APP_ENV", get("APP_ENV", "development"))?,
            reset_schema: parse("RESET_SCHEMA", get("RESET_SCHEMA", "false"))?,
            database,
        })
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError {
        key,
        reason: e.to_string(),
        value,
    })
}
