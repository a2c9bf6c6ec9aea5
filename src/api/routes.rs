/*
 * Responsibility
 * - URL 構造を定義
 * - gate の外: /health
 * - gate の内: それ以外すべて (fallback 含む)
 */
use axum::{Router, routing::get};

use crate::api::handlers::{fallback::no_route, health::health};
use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn gated_routes() -> Router<AppState> {
    Router::new().fallback(no_route)
}
