use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use parley_session::cookie::{clear_session_cookie, set_session_cookie};
use parley_session::extract::session_token_from_headers;
use parley_session::token::{
    ClaimsPatch, RefreshOutcome, SessionIdentity, patch_session_token, refresh_session_token,
    validate_session_token,
};

use crate::error::IdentityError;
use crate::handlers::{SessionResponse, session_expires_header};
use crate::state::AppState;
use crate::usecase::account::{UpdateProfileInput, UpdateProfileUseCase};

// ── GET /auth/session ─────────────────────────────────────────────────────────

pub async fn get_session(
    identity: SessionIdentity,
) -> Result<impl IntoResponse, IdentityError> {
    let mut headers = HeaderMap::new();
    let (name, value) = session_expires_header(identity.expires_at);
    headers.insert(name, value);

    let body = SessionResponse {
        account_id: identity.account_id,
        email: identity.email,
        method: identity.method,
        name: identity.name,
        picture: identity.picture,
        expires_at: identity.expires_at,
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

// ── PATCH /auth/session ───────────────────────────────────────────────────────

pub async fn refresh_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityError> {
    let token = session_token_from_headers(&headers).ok_or(IdentityError::Unauthenticated)?;

    let (jar, expires_at) = match refresh_session_token(&token, &state.session_secret)? {
        RefreshOutcome::Rotated { token, expires_at } => (
            set_session_cookie(jar, token, state.cookie_domain.clone()),
            expires_at,
        ),
        RefreshOutcome::Unchanged { expires_at } => (jar, expires_at),
    };

    let mut out = HeaderMap::new();
    let (name, value) = session_expires_header(expires_at);
    out.insert(name, value);

    Ok((StatusCode::OK, jar, out))
}

// ── PATCH /auth/session/profile ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub picture: Option<String>,
}

pub async fn patch_profile(
    State(state): State<AppState>,
    identity: SessionIdentity,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = UpdateProfileUseCase {
        accounts: state.account_repo(),
    };
    let account = usecase
        .execute(UpdateProfileInput {
            account_id: identity.account_id,
            display_name: body.name,
            avatar_url: body.picture,
        })
        .await?;

    // Re-sign the current token so the claims reflect the edit without
    // touching the expiry.
    let token = session_token_from_headers(&headers).ok_or(IdentityError::Unauthenticated)?;
    let patch = ClaimsPatch {
        name: account.display_name.clone(),
        picture: account.avatar_url.clone(),
    };
    let (token, expires_at) = patch_session_token(&token, &state.session_secret, &patch)?;
    let identity = validate_session_token(&token, &state.session_secret)?;

    let jar = set_session_cookie(jar, token, state.cookie_domain.clone());

    let mut out = HeaderMap::new();
    let (name, value) = session_expires_header(expires_at);
    out.insert(name, value);

    let body = SessionResponse {
        account_id: identity.account_id,
        email: identity.email,
        method: identity.method,
        name: identity.name,
        picture: identity.picture,
        expires_at,
    };
    Ok((StatusCode::OK, jar, out, Json(body)))
}

// ── DELETE /auth/session ──────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityError> {
    // Clearing the cookie must work even with an expired or tampered
    // token, so no identity check here.
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
