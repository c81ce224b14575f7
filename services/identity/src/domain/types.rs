use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use parley_session::method::AuthMethod;

/// Canonical user identity record, keyed by email. The single source of
/// truth every provider reconciles onto.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    /// Normalized (see [`normalize_email`]); unique in the store.
    pub email: String,
    pub email_verified: Option<DateTime<Utc>>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Present only for `credentials` accounts.
    pub password_hash: Option<String>,
    /// The method that created the account; never mutated afterwards.
    pub auth_method: AuthMethod,
    /// Informational external-provider account id (OAuth accounts).
    pub provider_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for account creation; the store assigns `id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub email_verified: Option<DateTime<Utc>>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
    pub auth_method: AuthMethod,
    pub provider_ref: Option<String>,
}

/// Partial profile update. Only these fields are reachable through
/// `update_profile`; `auth_method` and `password_hash` never are.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider_ref: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.avatar_url.is_none()
            && self.provider_ref.is_none()
            && self.email_verified.is_none()
    }
}

/// Profile fields asserted by a provider during sign-in.
#[derive(Debug, Clone, Default)]
pub struct SignInProfile {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A claimed identity entering the reconciler, produced by a successful
/// credential check, a redeemed sign-in link, or an OAuth callback.
#[derive(Debug, Clone)]
pub struct SignInAttempt {
    pub email: String,
    pub method: AuthMethod,
    /// Whether the provider asserted verified ownership of the email.
    pub verified_by_provider: bool,
    pub profile: SignInProfile,
    pub provider_ref: Option<String>,
}

/// Single-use token backing an emailed sign-in link.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    pub token: String,
    pub identifier: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Outbox event for async delivery (sign-in link email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Sign-in link token length in characters.
pub const SIGNIN_TOKEN_LEN: usize = 32;

/// Sign-in link time-to-live in seconds.
pub const SIGNIN_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Canonical email form used everywhere in the store: trimmed, lower-cased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Cheap shape check; real ownership proof comes from the provider or the
/// emailed link, never from parsing.
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}
