#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{Account, NewAccount, OutboxEvent, ProfilePatch, VerificationToken};
use crate::error::IdentityError;

/// Port over the account store. Implementations must enforce email
/// uniqueness at the storage layer, not by check-then-insert.
pub trait AccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, IdentityError>;

    /// Returns `DuplicateEmail` when the email is already taken.
    async fn create(&self, account: NewAccount) -> Result<Account, IdentityError>;

    async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> Result<Account, IdentityError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), IdentityError>;

    /// Removes the account and everything keyed to it (pending sign-in
    /// tokens) in one transaction.
    async fn delete_with_owned_data(&self, id: Uuid, email: &str) -> Result<(), IdentityError>;
}

/// Port over single-use sign-in tokens.
pub trait VerificationTokenRepository {
    /// Persists the token and its delivery event atomically. If the
    /// event cannot be recorded, the token must not exist either.
    async fn create_with_outbox(
        &self,
        token: VerificationToken,
        event: OutboxEvent,
    ) -> Result<(), IdentityError>;

    /// Atomic find-and-delete. Returns the row at most once per token;
    /// concurrent callers race for the single delete.
    async fn take(&self, token: &str) -> Result<Option<VerificationToken>, IdentityError>;

    /// Deletes tokens past their expiry; returns the count removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, IdentityError>;
}
