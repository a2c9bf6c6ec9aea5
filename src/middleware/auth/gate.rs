//! Token gate middleware: runs `TokenGate::authorize` before the inner router.
//!
//! - `Proceed` → the request continues unchanged
//! - `Reject(status)` → status-only response, the inner router never runs

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::services::auth::GateDecision;
use crate::state::AppState;

/// Put the token gate in front of every route (and the fallback) of `router`.
///
/// ```ignore
/// let gated = middleware::auth::gate::apply(api::routes(), state.clone());
/// let app = Router::new().merge(gated).with_state(state);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let decision = state
        .gate
        .authorize(req.uri().path(), req.headers())
        .await;

    match decision {
        GateDecision::Proceed => next.run(req).await,
        GateDecision::Reject(_) => decision.into_response(),
    }
}
