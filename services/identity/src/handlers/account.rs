use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use parley_session::cookie::clear_session_cookie;
use parley_session::token::SessionIdentity;

use crate::error::IdentityError;
use crate::state::AppState;
use crate::usecase::account::{DeleteAccountInput, DeleteAccountUseCase};

// ── DELETE /auth/account ──────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct DeleteAccountRequest {
    /// Current password, required for credentials accounts.
    #[serde(default)]
    pub password: Option<String>,
}

pub async fn delete_account(
    State(state): State<AppState>,
    identity: SessionIdentity,
    jar: CookieJar,
    Json(body): Json<DeleteAccountRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = DeleteAccountUseCase {
        accounts: state.account_repo(),
    };
    usecase
        .execute(DeleteAccountInput {
            account_id: identity.account_id,
            password: body.password,
        })
        .await?;

    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
