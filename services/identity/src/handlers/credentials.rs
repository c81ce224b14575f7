use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use parley_session::token::SessionIdentity;

use crate::domain::types::{AuthMethod, SignInAttempt, SignInProfile};
use crate::error::IdentityError;
use crate::handlers::establish_session;
use crate::state::AppState;
use crate::usecase::credentials::{
    ChangePasswordInput, ChangePasswordUseCase, RegisterInput, RegisterUseCase,
    VerifyCredentialsInput, VerifyCredentialsUseCase,
};
use crate::usecase::reconcile::ReconcileSignInUseCase;

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = RegisterUseCase {
        accounts: state.account_repo(),
    };
    let account = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            display_name: body.name,
        })
        .await?;

    let (jar, headers, body) = establish_session(&state, jar, &account)?;
    Ok((StatusCode::CREATED, jar, headers, body))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let verify = VerifyCredentialsUseCase {
        accounts: state.account_repo(),
    };
    let account = verify
        .execute(VerifyCredentialsInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    // Credential sign-ins still pass through the reconciler so every
    // path shares one set of account rules.
    let reconcile = ReconcileSignInUseCase {
        accounts: state.account_repo(),
    };
    let account = reconcile
        .execute(SignInAttempt {
            email: account.email,
            method: AuthMethod::Credentials,
            verified_by_provider: false,
            profile: SignInProfile::default(),
            provider_ref: None,
        })
        .await?;

    let (jar, headers, body) = establish_session(&state, jar, &account)?;
    Ok((StatusCode::CREATED, jar, headers, body))
}

// ── POST /auth/password ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, IdentityError> {
    let usecase = ChangePasswordUseCase {
        accounts: state.account_repo(),
    };
    usecase
        .execute(ChangePasswordInput {
            account_id: identity.account_id,
            current_password: body.current_password,
            new_password: body.new_password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
