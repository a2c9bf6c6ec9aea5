/*
 * Responsibility
 * - 環境変数の読み込み (PORT, AUTH_SERVICE_URL, gate 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use url::Url;

use crate::services::auth::GateConfig;
use crate::services::auth::gate::{DEFAULT_TIMEOUT_STATUS, DEFAULT_TOKEN_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Auth validator
    pub auth_service_url: Url,
    pub auth_token_prefix: String,
    pub auth_timeout_status: StatusCode,
    pub auth_validate_timeout: Duration,

    // HTTP plumbing
    pub http_request_timeout: Duration,
    pub http_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env, test fixtures).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 8000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let auth_service_url = lookup("AUTH_SERVICE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?;
        let auth_service_url =
            Url::parse(&auth_service_url).map_err(|_| ConfigError::Invalid("AUTH_SERVICE_URL"))?;
        if !matches!(auth_service_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("AUTH_SERVICE_URL"));
        }

        // Trailing whitespace is significant here ("Bearer "), so no trim.
        let auth_token_prefix =
            lookup("AUTH_TOKEN_PREFIX").unwrap_or_else(|| DEFAULT_TOKEN_PREFIX.to_string());
        if auth_token_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_TOKEN_PREFIX"));
        }

        let timeout_code: u16 = parse_or(&lookup, "AUTH_TIMEOUT_STATUS_CODE", DEFAULT_TIMEOUT_STATUS)?;
        let auth_timeout_status = StatusCode::from_u16(timeout_code)
            .map_err(|_| ConfigError::Invalid("AUTH_TIMEOUT_STATUS_CODE"))?;

        let validate_timeout_ms: u64 = parse_or(&lookup, "AUTH_VALIDATE_TIMEOUT_MS", 3000)?;
        if validate_timeout_ms == 0 {
            return Err(ConfigError::Invalid("AUTH_VALIDATE_TIMEOUT_MS"));
        }

        let request_timeout_secs: u64 = parse_or(&lookup, "HTTP_REQUEST_TIMEOUT_SECS", 30)?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("HTTP_REQUEST_TIMEOUT_SECS"));
        }

        // The validator bound must fire before the global request timeout, or a slow
        // auth service surfaces as 408 instead of 500.
        if validate_timeout_ms >= request_timeout_secs.saturating_mul(1000) {
            return Err(ConfigError::Invalid("AUTH_VALIDATE_TIMEOUT_MS"));
        }

        let http_body_limit_bytes: usize = parse_or(&lookup, "HTTP_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            auth_service_url,
            auth_token_prefix,
            auth_timeout_status,
            auth_validate_timeout: Duration::from_millis(validate_timeout_ms),
            http_request_timeout: Duration::from_secs(request_timeout_secs),
            http_body_limit_bytes,
        })
    }

    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            token_prefix: self.auth_token_prefix.clone(),
            timeout_status: self.auth_timeout_status,
            validate_timeout: self.auth_validate_timeout,
        }
    }
}

/// Absent -> `default`, present but unparsable -> `Invalid(key)`.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}
