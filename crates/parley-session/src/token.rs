//! Session-token mint, verification, sliding refresh, and in-place claim
//! patches.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

use crate::method::AuthMethod;

/// Session lifetime in seconds (30 days).
pub const SESSION_MAX_AGE: u64 = 30 * 24 * 60 * 60;

/// Sliding-refresh window in seconds (24 hours). A token younger than this is
/// returned unchanged by [`refresh_session_token`].
pub const SESSION_UPDATE_AGE: u64 = 24 * 60 * 60;

/// Errors returned by token verification and issuing.
///
/// All of these mean "treat the caller as unauthenticated"; none is fatal.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("token signing failed")]
    Signing,
}

/// JWT payload of a session token.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `sub` | account ID (UUID string), stable across refreshes |
/// | `email` | account email at mint time |
/// | `method` | [`AuthMethod`] that created the account |
/// | `name` / `picture` | profile snapshot, patchable in place |
/// | `iat` | mint or last-rotation instant (seconds since epoch) |
/// | `exp` | expiry instant (seconds since epoch) |
///
/// [`Deserialize`] is always available since every consumer verifies tokens.
/// [`Serialize`] requires the `USE_ONLY_IN_IDENTITY_SERVICE` feature because
/// the identity service is the sole issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test), derive(Serialize))]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub method: AuthMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

/// Verified per-request identity, decoded out of a session token.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub account_id: Uuid,
    pub email: String,
    pub method: AuthMethod,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub expires_at: u64,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Decode and verify a session token, returning raw claims.
///
/// HS256 only, required claims `exp` + `sub`. Expiry is checked with zero
/// leeway: a session is invalid the moment `exp` passes. All services share
/// one clock source, so no skew window is granted.
fn decode_session(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    Ok(data.claims)
}

/// Verify a session token and return the identity it carries.
///
/// This is the API every collaborator calls on each authenticated request.
/// A failure here always means "unauthenticated", never a crash.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionIdentity, SessionError> {
    let claims = decode_session(token, secret)?;
    let account_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    Ok(SessionIdentity {
        account_id,
        email: claims.email,
        method: claims.method,
        name: claims.name,
        picture: claims.picture,
        expires_at: claims.exp,
    })
}

// ── Issuing APIs: identity service only ──────────────────────────────────────

/// Account snapshot the identity service mints a session from.
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
#[derive(Debug, Clone)]
pub struct MintSession {
    pub account_id: Uuid,
    pub email: String,
    pub method: AuthMethod,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
fn sign(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| SessionError::Signing)
}

/// Mint a fresh session token. Returns the token and its expiry instant.
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
pub fn mint_session_token(
    session: &MintSession,
    secret: &str,
) -> Result<(String, u64), SessionError> {
    let now = now_secs();
    let claims = SessionClaims {
        sub: session.account_id.to_string(),
        email: session.email.clone(),
        method: session.method,
        name: session.name.clone(),
        picture: session.picture.clone(),
        iat: now,
        exp: now + SESSION_MAX_AGE,
    };
    let token = sign(&claims, secret)?;
    Ok((token, claims.exp))
}

/// Result of a sliding-refresh attempt on a still-valid token.
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The token was older than [`SESSION_UPDATE_AGE`] and has been re-signed
    /// with a new expiry. The subject and snapshot fields are unchanged.
    Rotated { token: String, expires_at: u64 },
    /// The token is still inside the update window; keep presenting it.
    Unchanged { expires_at: u64 },
}

/// Extend a session's lifetime without re-authentication.
///
/// Re-signs at most once per [`SESSION_UPDATE_AGE`] window. An expired
/// signature cannot be refreshed; the caller must sign in again.
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
pub fn refresh_session_token(token: &str, secret: &str) -> Result<RefreshOutcome, SessionError> {
    let claims = decode_session(token, secret)?;
    let now = now_secs();
    if now.saturating_sub(claims.iat) < SESSION_UPDATE_AGE {
        return Ok(RefreshOutcome::Unchanged {
            expires_at: claims.exp,
        });
    }
    let rotated = SessionClaims {
        iat: now,
        exp: now + SESSION_MAX_AGE,
        ..claims
    };
    let token = sign(&rotated, secret)?;
    Ok(RefreshOutcome::Rotated {
        token,
        expires_at: rotated.exp,
    })
}

/// Partial claim update applied by [`patch_session_token`]. `None` fields are
/// left as they are.
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
#[derive(Debug, Default, Clone)]
pub struct ClaimsPatch {
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Re-sign the current session with updated profile snapshot fields.
///
/// Subject, expiry, and mint instant are preserved: this reflects an
/// out-of-band profile edit into the bearer token without logout/login and
/// without extending the session.
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
pub fn patch_session_token(
    token: &str,
    secret: &str,
    patch: &ClaimsPatch,
) -> Result<(String, u64), SessionError> {
    let mut claims = decode_session(token, secret)?;
    if let Some(name) = &patch.name {
        claims.name = Some(name.clone());
    }
    if let Some(picture) = &patch.picture {
        claims.picture = Some(picture.clone());
    }
    let token = sign(&claims, secret)?;
    Ok((token, claims.exp))
}
