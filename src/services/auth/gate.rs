/*
 * Responsibility
 * - bypass 判定 → Authorization ヘッダの prefix チェック → 外部検証 → GateDecision
 * - どの経路でも必ず GateDecision を 1 つ返す (panic / timeout も含めて)
 */
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header};
use futures::FutureExt;

use crate::services::auth::bypass::should_bypass;
use crate::services::auth::outcome::{GateDecision, ValidationOutcome};
use crate::services::auth::validator::TokenValidator;

pub const DEFAULT_TOKEN_PREFIX: &str = "Bearer ";
pub const DEFAULT_TIMEOUT_STATUS: u16 = 419;
pub const DEFAULT_VALIDATE_TIMEOUT: Duration = Duration::from_secs(3);

/// Immutable gate settings, built once at startup.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Required at the start of a present `Authorization` header, and stripped
    /// before the token is sent for validation.
    pub token_prefix: String,
    /// Status answered for expired tokens.
    pub timeout_status: StatusCode,
    /// Upper bound for one validator call.
    pub validate_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            // 419 is a valid (non-standard) status code.
            timeout_status: StatusCode::from_u16(DEFAULT_TIMEOUT_STATUS)
                .unwrap_or(StatusCode::UNAUTHORIZED),
            validate_timeout: DEFAULT_VALIDATE_TIMEOUT,
        }
    }
}

/// Per-request authentication gate.
#[derive(Clone)]
pub struct TokenGate {
    config: GateConfig,
    validator: Arc<dyn TokenValidator>,
}

impl std::fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGate")
            .field("config", &self.config)
            .field("validator", &self.validator.backend_name())
            .finish()
    }
}

/// Token extracted from the request, before remote validation.
enum Extracted<'a> {
    Token(&'a str),
    Malformed,
    Unreadable,
}

impl TokenGate {
    pub fn new(config: GateConfig, validator: Arc<dyn TokenValidator>) -> Self {
        Self { config, validator }
    }

    /// Decide whether the request at `path` carrying `headers` may proceed.
    ///
    /// Never fails: transport errors, timeouts and validator panics all end in
    /// `Reject(500)`.
    pub async fn authorize(&self, path: &str, headers: &HeaderMap) -> GateDecision {
        if should_bypass(path) {
            tracing::debug!(path, "auth bypass");
            return GateDecision::Proceed;
        }

        let token = match self.extract(headers) {
            Extracted::Token(token) => token,
            Extracted::Malformed => {
                tracing::info!(path, "authorization header without expected prefix");
                return GateDecision::Reject(StatusCode::UNAUTHORIZED);
            }
            Extracted::Unreadable => {
                tracing::warn!(path, "authorization header is not valid text");
                return GateDecision::Reject(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        let outcome = self.validate(token).await;
        let decision = self.decide(outcome);

        if !decision.is_proceed() {
            tracing::warn!(
                path,
                ?outcome,
                status_num = outcome.status_num(),
                ?decision,
                "token rejected"
            );
        }
        decision
    }

    fn extract<'a>(&self, headers: &'a HeaderMap) -> Extracted<'a> {
        // Only the first Authorization header counts.
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Extracted::Token("");
        };

        // An empty header carries no credential; the auth service reports it as missing.
        if value.is_empty() {
            return Extracted::Token("");
        }

        // Prefix check on raw bytes: a value without the prefix is a local 401
        // even when it is not valid text.
        let prefix = self.config.token_prefix.as_bytes();
        if !value.as_bytes().starts_with(prefix) {
            return Extracted::Malformed;
        }

        match value.to_str() {
            Ok(raw) => Extracted::Token(&raw[prefix.len()..]),
            Err(_) => Extracted::Unreadable,
        }
    }

    async fn validate(&self, token: &str) -> ValidationOutcome {
        let call = AssertUnwindSafe(self.validator.validate(token)).catch_unwind();

        match tokio::time::timeout(self.config.validate_timeout, call).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_panic)) => {
                tracing::error!(
                    backend = self.validator.backend_name(),
                    "token validator panicked"
                );
                ValidationOutcome::TransportError
            }
            Err(_elapsed) => {
                tracing::warn!(
                    backend = self.validator.backend_name(),
                    timeout_ms = self.config.validate_timeout.as_millis() as u64,
                    "token validation timed out"
                );
                ValidationOutcome::TransportError
            }
        }
    }

    /// Map a validation outcome to the gate decision.
    pub fn decide(&self, outcome: ValidationOutcome) -> GateDecision {
        match outcome {
            ValidationOutcome::Valid => GateDecision::Proceed,
            ValidationOutcome::Expired => GateDecision::Reject(self.config.timeout_status),
            ValidationOutcome::Invalid | ValidationOutcome::TransportError => {
                GateDecision::Reject(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ValidationOutcome::Missing => GateDecision::Reject(StatusCode::UNAUTHORIZED),
        }
    }
}
