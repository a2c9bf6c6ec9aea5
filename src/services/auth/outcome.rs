//! Remote validation result and the gate decision derived from it.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Result of one remote token check.
///
/// Wire codes (auth service `statusNum`):
/// - `1` valid
/// - `2` expired
/// - `3` invalid
/// - `0` missing
/// - `-1` transport error (local only, never sent by the auth service)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Expired,
    Invalid,
    Missing,
    TransportError,
}

impl ValidationOutcome {
    /// Decode the auth service status number.
    ///
    /// Unknown numbers (including `-1`) collapse to `TransportError`: the
    /// response did not say anything we can act on.
    pub fn from_status_num(n: i32) -> Self {
        match n {
            1 => Self::Valid,
            2 => Self::Expired,
            3 => Self::Invalid,
            0 => Self::Missing,
            _ => Self::TransportError,
        }
    }

    pub fn status_num(self) -> i32 {
        match self {
            Self::Valid => 1,
            Self::Expired => 2,
            Self::Invalid => 3,
            Self::Missing => 0,
            Self::TransportError => -1,
        }
    }
}

/// What the gate does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Reject(StatusCode),
}

impl GateDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Rejections are status-only: empty body, no extra headers.
///
/// `Proceed` has no response of its own; callers must run the next service
/// instead. Rendering it anyway yields 500 so a wiring mistake never lets a
/// request through silently.
impl IntoResponse for GateDecision {
    fn into_response(self) -> Response {
        match self {
            Self::Reject(status) => status.into_response(),
            Self::Proceed => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
