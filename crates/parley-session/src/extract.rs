//! Authenticated-request extractor.

use axum::extract::FromRequestParts;
use axum_extra::extract::cookie::CookieJar;
use http::request::Parts;
use http::{HeaderMap, StatusCode, header::AUTHORIZATION};

use crate::cookie::SESSION_COOKIE;
use crate::token::{SessionIdentity, validate_session_token};

/// Implemented by each service's application state so the extractor can reach
/// the shared signing secret.
pub trait SessionSecret {
    fn session_secret(&self) -> &str;
}

/// Pull the raw session token from a request: the session cookie first, then
/// an `Authorization: Bearer` header for cookie-less API clients.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = CookieJar::from_headers(headers).get(SESSION_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

impl<S> FromRequestParts<S> for SessionIdentity
where
    S: SessionSecret + Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = match session_token_from_headers(&parts.headers) {
            Some(token) => validate_session_token(&token, state.session_secret())
                .map_err(|_| StatusCode::UNAUTHORIZED),
            None => Err(StatusCode::UNAUTHORIZED),
        };
        async move { result }
    }
}
