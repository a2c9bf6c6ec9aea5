//! Token validator interface used by the gate.
use async_trait::async_trait;

use crate::services::auth::outcome::ValidationOutcome;

/// Checks a bare token (prefix already stripped) against the source of truth.
///
/// Implementations must not fail: every transport or decode problem is
/// reported as [`ValidationOutcome::TransportError`].
///
/// Implementations must be cheap to share (typically `Arc<...>` inside).
#[async_trait]
pub trait TokenValidator: Send + Sync + 'static {
    // Backend name, for logging.
    fn backend_name(&self) -> &'static str;

    async fn validate(&self, token: &str) -> ValidationOutcome;
}
