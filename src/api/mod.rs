/*
 * Responsibility
 * - 公開ポイント (routes() / gated_routes() の re-export)
 */
pub mod handlers;
mod routes;

pub use routes::{gated_routes, public_routes};
