//! Bearer-credential extraction from request headers.

use http::header::{ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, ORIGIN};
use http::{HeaderMap, Method};

/// Extract the bearer token from the `Authorization` header.
///
/// Returns `None` for a missing header, a non-bearer scheme, or an empty
/// token value; callers treat all three as "no credential presented".
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// CORS preflight: OPTIONS with `Origin` and `Access-Control-Request-Method`.
/// Preflights never carry credentials and must not be challenged.
#[must_use]
pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(ORIGIN)
        && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}
