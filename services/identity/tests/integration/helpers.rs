use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use parley_identity::domain::repository::{AccountRepository, VerificationTokenRepository};
use parley_identity::domain::types::{
    Account, AuthMethod, NewAccount, OutboxEvent, ProfilePatch, VerificationToken,
};
use parley_identity::error::IdentityError;

/// Low bcrypt cost to keep the suite fast; production uses DEFAULT_COST.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn hash(password: &str) -> String {
    bcrypt::hash(password, TEST_BCRYPT_COST).unwrap()
}

pub fn credentials_account(email: &str, password: &str) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        email_verified: None,
        display_name: Some("Test User".to_owned()),
        avatar_url: None,
        password_hash: Some(hash(password)),
        auth_method: AuthMethod::Credentials,
        provider_ref: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn oauth_account(email: &str) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        email_verified: Some(now),
        display_name: Some("OAuth User".to_owned()),
        avatar_url: Some("https://cdn.example.com/a.png".to_owned()),
        password_hash: None,
        auth_method: AuthMethod::Oauth,
        provider_ref: Some("google:12345".to_owned()),
        created_at: now,
        updated_at: now,
    }
}

// ── MockAccountRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockAccountRepo {
    pub accounts: Arc<Mutex<Vec<Account>>>,
}

impl MockAccountRepo {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the account list for post-execution inspection.
    pub fn handle(&self) -> Arc<Mutex<Vec<Account>>> {
        Arc::clone(&self.accounts)
    }
}

impl AccountRepository for MockAccountRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, IdentityError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        // Mirrors the store's unique index on email.
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(IdentityError::DuplicateEmail);
        }
        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            email: account.email,
            email_verified: account.email_verified,
            display_name: account.display_name,
            avatar_url: account.avatar_url,
            password_hash: account.password_hash,
            auth_method: account.auth_method,
            provider_ref: account.provider_ref,
            created_at: now,
            updated_at: now,
        };
        accounts.push(created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: ProfilePatch,
    ) -> Result<Account, IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(IdentityError::Unauthenticated)?;
        if let Some(name) = patch.display_name {
            account.display_name = Some(name);
        }
        if let Some(url) = patch.avatar_url {
            account.avatar_url = Some(url);
        }
        if let Some(provider_ref) = patch.provider_ref {
            account.provider_ref = Some(provider_ref);
        }
        if let Some(verified) = patch.email_verified {
            account.email_verified = Some(verified);
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(IdentityError::Unauthenticated)?;
        account.password_hash = Some(password_hash.to_owned());
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_with_owned_data(&self, id: Uuid, _email: &str) -> Result<(), IdentityError> {
        self.accounts.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }
}

// ── MockTokenRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockTokenRepo {
    pub tokens: Arc<Mutex<Vec<VerificationToken>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockTokenRepo {
    pub fn new(tokens: Vec<VerificationToken>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
            events: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn tokens_handle(&self) -> Arc<Mutex<Vec<VerificationToken>>> {
        Arc::clone(&self.tokens)
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.events)
    }
}

impl VerificationTokenRepository for MockTokenRepo {
    async fn create_with_outbox(
        &self,
        token: VerificationToken,
        event: OutboxEvent,
    ) -> Result<(), IdentityError> {
        self.tokens.lock().unwrap().push(token);
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn take(&self, token: &str) -> Result<Option<VerificationToken>, IdentityError> {
        let mut tokens = self.tokens.lock().unwrap();
        let pos = tokens.iter().position(|t| t.token == token);
        Ok(pos.map(|i| tokens.remove(i)))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, IdentityError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| !t.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}
