use std::str::FromStr;

use crate::auth::JwtConfig;
use crate::auth::jwt::{
    DEFAULT_AUDIENCE, DEFAULT_EXPIRATION_MINUTES, DEFAULT_ISSUER, MIN_SECRET_LEN,
    generate_printable_secret,
};
use crate::utils::{AppError, ErrorCode};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_URL | sqlite:foodgram.db | SQLite database |
/// | HTTP_PORT | 8000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | level when RUST_LOG is unset |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | unset | daily rolling log files |
/// | JWT_SECRET | random in development | HMAC secret, at least 32 chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | JWT_ISSUER | foodgram | expected `iss` |
/// | JWT_AUDIENCE | foodgram-clients | expected `aud` |
/// | PAGE_SIZE | 6 | default page size |
/// | MAX_PAGE_SIZE | 100 | page size cap |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
///
/// # Example
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/foodgram.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub jwt: JwtConfig,
    pub page_size: u32,
    pub max_page_size: u32,
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.len() >= MIN_SECRET_LEN => secret,
            Some(_) => {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    format!("JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"),
                ));
            }
            None if environment == "development" => {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                generate_printable_secret()
            }
            None => {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    "JWT_SECRET must be set outside development",
                ));
            }
        };

        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:foodgram.db".into()),
            http_port: parse(lookup("HTTP_PORT")).unwrap_or(8000),
            environment,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse(lookup("LOG_JSON")).unwrap_or(false),
            log_dir: lookup("LOG_DIR").filter(|d| !d.is_empty()),
            jwt: JwtConfig {
                secret,
                expiration_minutes: parse(lookup("JWT_EXPIRATION_MINUTES"))
                    .unwrap_or(DEFAULT_EXPIRATION_MINUTES),
                issuer: lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.into()),
                audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.into()),
            },
            page_size: parse::<u32>(lookup("PAGE_SIZE")).filter(|&n| n > 0).unwrap_or(6),
            max_page_size: parse::<u32>(lookup("MAX_PAGE_SIZE"))
                .filter(|&n| n > 0)
                .unwrap_or(100),
            request_timeout_ms: parse(lookup("REQUEST_TIMEOUT_MS")).unwrap_or(30_000),
        };

        Ok(config)
    }

    /// Development defaults around a fixed secret
    ///
    /// Common in tests
    pub fn development(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 8000,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            jwt: JwtConfig::with_secret(jwt_secret),
            page_size: 6,
            max_page_size: 100,
            request_timeout_ms: 30_000,
        }
    }
}

/// Parse a trimmed value; unparsable input counts as unset
fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite:foodgram.db");
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.jwt.issuer, "foodgram");
        assert_eq!(config.environment, "development");
        assert!(config.jwt.secret.len() >= MIN_SECRET_LEN);
    }

    #[test]
    fn test_overrides() {
        let secret = "s".repeat(40);
        let config = load(&[
            ("HTTP_PORT", "9000"),
            ("PAGE_SIZE", "10"),
            ("LOG_JSON", "true"),
            ("JWT_SECRET", &secret),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.page_size, 10);
        assert!(config.log_json);
        assert_eq!(config.jwt.secret, secret);
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = load(&[("HTTP_PORT", "eighty"), ("PAGE_SIZE", "0")]).unwrap();
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.page_size, 6);
    }

    #[test]
    fn test_typed_values_parse() {
        let config = load(&[
            ("LOG_JSON", "false"),
            ("JWT_EXPIRATION_MINUTES", "60"),
            ("MAX_PAGE_SIZE", "50"),
            ("REQUEST_TIMEOUT_MS", " 1500 "),
        ])
        .unwrap();
        assert!(!config.log_json);
        assert_eq!(config.jwt.expiration_minutes, 60);
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.request_timeout_ms, 1500);
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = load(&[("JWT_SECRET", "short")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_production_requires_secret() {
        let err = load(&[("ENVIRONMENT", "production")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
