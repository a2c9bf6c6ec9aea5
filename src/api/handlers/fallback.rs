/*
 * Responsibility
 * - gate を通過したが行き先の無いリクエストへの応答
 * - backend へのルーティングはこの crate の外 (埋め込み側の Router が担当)
 */
use axum::http::Uri;

use crate::error::AppError;

pub async fn no_route(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no upstream route");
    AppError::not_found(format!("route {}", uri.path()))
}
