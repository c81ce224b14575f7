use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::config::OAuthProviderKind;
use crate::domain::types::{AuthMethod, SignInAttempt, SignInProfile};
use crate::error::IdentityError;
use crate::handlers::establish_session;
use crate::state::AppState;
use crate::usecase::reconcile::ReconcileSignInUseCase;

/// Identity assertion produced by the OAuth gateway after it has
/// completed the code exchange and verified the provider's ID token.
#[derive(Deserialize)]
pub struct OAuthCallbackRequest {
    pub provider: String,
    /// Provider's stable account id for this user.
    pub provider_account_id: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

// ── POST /auth/oauth/callback ─────────────────────────────────────────────────

pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<OAuthCallbackRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let kind = OAuthProviderKind::parse(&body.provider).ok_or_else(|| {
        IdentityError::InvalidInput(format!("unknown provider: {}", body.provider))
    })?;
    if !state.providers.oauth_enabled(kind) {
        return Err(IdentityError::InvalidInput(format!(
            "provider not enabled: {}",
            body.provider
        )));
    }

    // An assertion without an email cannot be mapped onto an account.
    let email = body.email.ok_or(IdentityError::UnverifiableIdentity)?;

    let reconcile = ReconcileSignInUseCase {
        accounts: state.account_repo(),
    };
    let account = reconcile
        .execute(SignInAttempt {
            email,
            method: AuthMethod::Oauth,
            verified_by_provider: body.email_verified.unwrap_or(false),
            profile: SignInProfile {
                name: body.name,
                avatar_url: body.picture,
            },
            provider_ref: Some(format!("{}:{}", kind.as_str(), body.provider_account_id)),
        })
        .await?;

    let (jar, headers, body) = establish_session(&state, jar, &account)?;
    Ok((StatusCode::CREATED, jar, headers, body))
}
