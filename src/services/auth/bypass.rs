/*
 * Responsibility
 * - 認証不要パスの判定 (exact match + prefix match)
 * - path のみで判定する (method / header は見ない)
 */
use std::collections::HashSet;
use std::sync::LazyLock;

/// Paths that skip the token gate when matched exactly.
const EXACT_PATHS: &[&str] = &[
    "/auths/login",
    "/auths/join",
    "/auths/login/oauth",
    "/auths/logout",
    "/auths/refresh",
    "/auths/re/tokens",
    "/orders/prepare",
    "/orders/update-fail",
    "/orders/update-success",
];

/// Path prefixes that skip the token gate.
const PREFIX_PATHS: &[&str] = &["/auths/email", "/api/geocode", "/auths/check-id"];

static EXACT: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| EXACT_PATHS.iter().copied().collect());

/// Returns `true` when `path` does not need a bearer token.
///
/// The path is compared as received; no trailing-slash or case normalization.
pub fn should_bypass(path: &str) -> bool {
    EXACT.contains(path) || PREFIX_PATHS.iter().any(|prefix| path.starts_with(prefix))
}
