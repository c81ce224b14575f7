pub mod account;
pub mod credentials;
pub mod health;
pub mod oauth;
pub mod providers;
pub mod session;
pub mod signin_link;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Serialize;
use uuid::Uuid;

use parley_session::cookie::set_session_cookie;
use parley_session::method::AuthMethod;
use parley_session::token::{MintSession, mint_session_token};

use crate::domain::types::Account;
use crate::error::IdentityError;
use crate::state::AppState;

const X_PARLEY_SESSION_EXPIRES: &str = "x-parley-session-expires";

fn session_expires_header(exp: u64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(X_PARLEY_SESSION_EXPIRES),
        HeaderValue::from_str(&exp.to_string()).unwrap(),
    )
}

/// Session snapshot returned by every endpoint that establishes or
/// inspects a session.
#[derive(Serialize)]
pub struct SessionResponse {
    pub account_id: Uuid,
    pub email: String,
    pub method: AuthMethod,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub expires_at: u64,
}

/// Mint a session for a reconciled account and attach it to the
/// response as cookie + expiry header.
fn establish_session(
    state: &AppState,
    jar: CookieJar,
    account: &Account,
) -> Result<(CookieJar, HeaderMap, Json<SessionResponse>), IdentityError> {
    let mint = MintSession {
        account_id: account.id,
        email: account.email.clone(),
        method: account.auth_method,
        name: account.display_name.clone(),
        picture: account.avatar_url.clone(),
    };
    let (token, expires_at) = mint_session_token(&mint, &state.session_secret)
        .map_err(|e| anyhow::Error::new(e).context("mint session token"))?;

    let jar = set_session_cookie(jar, token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = session_expires_header(expires_at);
    headers.insert(name, value);

    let body = SessionResponse {
        account_id: account.id,
        email: account.email.clone(),
        method: account.auth_method,
        name: account.display_name.clone(),
        picture: account.avatar_url.clone(),
        expires_at,
    };
    Ok((jar, headers, Json(body)))
}
