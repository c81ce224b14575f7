use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::domain::types::{AuthMethod, SignInAttempt, SignInProfile};
use crate::error::IdentityError;
use crate::handlers::establish_session;
use crate::state::AppState;
use crate::usecase::reconcile::ReconcileSignInUseCase;
use crate::usecase::signin_link::{
    IssueSignInLinkInput, IssueSignInLinkUseCase, RedeemSignInLinkInput, RedeemSignInLinkUseCase,
};

// ── POST /auth/email ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestSignInLinkRequest {
    pub email: String,
}

pub async fn request_signin_link(
    State(state): State<AppState>,
    Json(body): Json<RequestSignInLinkRequest>,
) -> Result<StatusCode, IdentityError> {
    if !state.providers.email_link {
        return Err(IdentityError::InvalidInput(
            "email sign-in is not enabled".to_owned(),
        ));
    }

    let usecase = IssueSignInLinkUseCase {
        tokens: state.verification_token_repo(),
        public_url: state.public_url.clone(),
    };
    usecase
        .execute(IssueSignInLinkInput { email: body.email })
        .await?;

    // Accepted regardless of whether the email maps to an account.
    Ok(StatusCode::ACCEPTED)
}

// ── POST /auth/email/redeem ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub token: String,
}

pub async fn redeem_signin_link(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RedeemRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let redeem = RedeemSignInLinkUseCase {
        tokens: state.verification_token_repo(),
    };
    let email = redeem
        .execute(RedeemSignInLinkInput { token: body.token })
        .await?;

    // A redeemed link proves ownership of the mailbox.
    let reconcile = ReconcileSignInUseCase {
        accounts: state.account_repo(),
    };
    let account = reconcile
        .execute(SignInAttempt {
            email,
            method: AuthMethod::EmailLink,
            verified_by_provider: true,
            profile: SignInProfile::default(),
            provider_ref: None,
        })
        .await?;

    let (jar, headers, body) = establish_session(&state, jar, &account)?;
    Ok((StatusCode::CREATED, jar, headers, body))
}
