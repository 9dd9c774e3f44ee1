//! Server configuration from environment variables.

use axum::http::HeaderValue;
use std::env;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Origins allowed to make cross-origin requests.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    /// Deployment name reported by the welcome route, e.g. "production"
    pub environment: String,
    pub cors_origins: CorsOrigins,
    /// Mount point of the dish routes, always starting with `/` and never
    /// ending with one (empty means the root)
    pub api_prefix: String,
    pub pool_size: u32,
    /// Add an `X-DB-Query-Count` header to every response
    pub track_query_count: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`: PostgreSQL connection string
    ///
    /// Optional:
    /// - `PORT`: listen port (default: 3000)
    /// - `APP_ENV`: deployment name (default: "development")
    /// - `CORS_ORIGIN`: `*` or a comma-separated origin list (default: "*")
    /// - `API_PREFIX`: route prefix (default: "/api/v1")
    /// - `DATABASE_POOL_SIZE`: max pooled connections (default: 10)
    /// - `TRACK_DB_QUERY_COUNT`: `1` to report per-request query counts
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let pool_size = parse_or(
            "DATABASE_POOL_SIZE",
            lookup("DATABASE_POOL_SIZE"),
            DEFAULT_POOL_SIZE,
        )?;

        let environment =
            lookup("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let cors_origins = parse_cors_origins(lookup("CORS_ORIGIN").as_deref())?;

        let api_prefix = normalize_prefix(
            lookup("API_PREFIX")
                .as_deref()
                .unwrap_or(DEFAULT_API_PREFIX),
        );

        let track_query_count = lookup("TRACK_DB_QUERY_COUNT")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            port,
            environment,
            cors_origins,
            api_prefix,
            pool_size,
            track_query_count,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_cors_origins(value: Option<&str>) -> Result<CorsOrigins, ConfigError> {
    let value = value.map(str::trim).unwrap_or("*");
    if value.is_empty() || value == "*" {
        return Ok(CorsOrigins::Any);
    }

    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
                key: "CORS_ORIGIN",
                value: origin.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "postgres://localhost/thali_test".to_string(),
        port: DEFAULT_PORT,
        environment: "test".to_string(),
        cors_origins: CorsOrigins::Any,
        api_prefix: DEFAULT_API_PREFIX.to_string(),
        pool_size: 1,
        track_query_count: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://db/thali")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.cors_origins, CorsOrigins::Any);
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.pool_size, 10);
        assert!(!config.track_query_count);
    }

    #[test]
    fn test_database_url_is_required() {
        let err = load(&[("PORT", "8080")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DATABASE_URL", "postgres://db"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_cors_origin_list() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db"),
            ("CORS_ORIGIN", "https://a.example, https://b.example"),
        ])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                HeaderValue::from_static("https://a.example"),
                HeaderValue::from_static("https://b.example"),
            ])
        );
    }

    #[test]
    fn test_prefix_is_normalized() {
        assert_eq!(normalize_prefix("api/"), "/api");
        assert_eq!(normalize_prefix("/api/v2/"), "/api/v2");
        assert_eq!(normalize_prefix("/"), "");
    }
}
