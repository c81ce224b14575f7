use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use parley_session::token::SessionError;

/// Identity service error variants.
///
/// Client-visible messages never distinguish "no such account" from "wrong
/// password" or "no password set"; those distinctions exist only for
/// telemetry (`kind()`), and the wire rendering collapses them.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Account exists but was created without a password (OAuth/email-link).
    /// Rendered to the client exactly like [`Self::InvalidCredentials`].
    #[error("invalid email or password")]
    NoCredentialsSet,
    #[error("link expired or already used")]
    InvalidOrExpiredToken,
    #[error("identity assertion is missing a usable email")]
    UnverifiableIdentity,
    #[error("unauthorized")]
    Unauthenticated,
    #[error("{0}")]
    InvalidInput(String),
    #[error("store temporarily unavailable")]
    StoreUnavailable,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IdentityError {
    /// Telemetry kind. [`Self::NoCredentialsSet`] keeps its own kind here so
    /// logs can tell the cases apart even though the response cannot.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NoCredentialsSet => "NO_CREDENTIALS_SET",
            Self::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            Self::UnverifiableIdentity => "UNVERIFIABLE_IDENTITY",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Wire kind: the enumeration-sensitive variants collapse to one value.
    fn client_kind(&self) -> &'static str {
        match self {
            Self::NoCredentialsSet => "INVALID_CREDENTIALS",
            other => other.kind(),
        }
    }
}

// A session verification failure is never fatal: the request is simply
// unauthenticated and the caller re-authenticates.
impl From<SessionError> for IdentityError {
    fn from(_: SessionError) -> Self {
        Self::Unauthenticated
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::NoCredentialsSet
            | Self::InvalidOrExpiredToken
            | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::UnverifiableIdentity | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only; tower-http TraceLayer already records method/uri/status
        // for all requests. 4xx are expected client errors; the one telemetry
        // exception is NoCredentialsSet, whose wire rendering hides the real kind.
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            Self::NoCredentialsSet => {
                tracing::debug!(kind = "NO_CREDENTIALS_SET", "credential check on passwordless account")
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.client_kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
