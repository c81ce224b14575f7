use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::VerificationTokenRepository;
use crate::domain::types::{
    OutboxEvent, SIGNIN_TOKEN_LEN, SIGNIN_TOKEN_TTL_SECS, VerificationToken, is_plausible_email,
    normalize_email,
};
use crate::error::IdentityError;

/// Charset for sign-in link tokens (uppercase alphanumeric, URL-safe).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..SIGNIN_TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

pub struct IssueSignInLinkInput {
    pub email: String,
}

pub struct IssueSignInLinkUseCase<T>
where
    T: VerificationTokenRepository,
{
    pub tokens: T,
    /// External base URL the redeem link is built against.
    pub public_url: String,
}

impl<T> IssueSignInLinkUseCase<T>
where
    T: VerificationTokenRepository,
{
    pub async fn execute(&self, input: IssueSignInLinkInput) -> Result<(), IdentityError> {
        let email = normalize_email(&input.email);
        if !is_plausible_email(&email) {
            return Err(IdentityError::InvalidInput("invalid email".to_owned()));
        }

        // No account lookup here: whether the email is known must not be
        // observable, and the account is created at redemption anyway.
        let token = generate_token();
        let now = Utc::now();
        let record = VerificationToken {
            token: token.clone(),
            identifier: email.clone(),
            expires_at: now + Duration::seconds(SIGNIN_TOKEN_TTL_SECS),
            created_at: now,
        };

        let url = format!(
            "{}/auth/email/redeem?token={token}",
            self.public_url.trim_end_matches('/')
        );
        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "signin_link_issued".to_owned(),
            payload: json!({ "email": email, "url": url }),
            idempotency_key: format!("signin_link_issued:{token}"),
        };

        self.tokens.create_with_outbox(record, event).await
    }
}

pub struct RedeemSignInLinkInput {
    pub token: String,
}

pub struct RedeemSignInLinkUseCase<T>
where
    T: VerificationTokenRepository,
{
    pub tokens: T,
}

impl<T> RedeemSignInLinkUseCase<T>
where
    T: VerificationTokenRepository,
{
    /// Returns the verified email. The token is deleted before the
    /// expiry check so a replay never succeeds, expired or not.
    pub async fn execute(&self, input: RedeemSignInLinkInput) -> Result<String, IdentityError> {
        let record = self
            .tokens
            .take(&input.token)
            .await?
            .ok_or(IdentityError::InvalidOrExpiredToken)?;

        if record.is_expired(Utc::now()) {
            return Err(IdentityError::InvalidOrExpiredToken);
        }
        Ok(record.identifier)
    }
}
