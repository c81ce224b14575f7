use anyhow::Context;
use uuid::Uuid;

use crate::domain::repository::AccountRepository;
use crate::domain::types::{
    Account, AuthMethod, MIN_PASSWORD_LEN, NewAccount, is_plausible_email, normalize_email,
};
use crate::error::IdentityError;

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).context("hash password")?;
    Ok(hash)
}

fn check_password_length(password: &str) -> Result<(), IdentityError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(IdentityError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

pub struct RegisterUseCase<A>
where
    A: AccountRepository,
{
    pub accounts: A,
}

impl<A> RegisterUseCase<A>
where
    A: AccountRepository,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<Account, IdentityError> {
        let email = normalize_email(&input.email);
        if !is_plausible_email(&email) {
            return Err(IdentityError::InvalidInput("invalid email".to_owned()));
        }
        check_password_length(&input.password)?;

        let password_hash = hash_password(&input.password)?;

        // Uniqueness is enforced by the store's index; a duplicate
        // surfaces as DuplicateEmail, never via check-then-insert.
        self.accounts
            .create(NewAccount {
                email,
                email_verified: None,
                display_name: input.display_name,
                avatar_url: None,
                password_hash: Some(password_hash),
                auth_method: AuthMethod::Credentials,
                provider_ref: None,
            })
            .await
    }
}

pub struct VerifyCredentialsInput {
    pub email: String,
    pub password: String,
}

pub struct VerifyCredentialsUseCase<A>
where
    A: AccountRepository,
{
    pub accounts: A,
}

impl<A> VerifyCredentialsUseCase<A>
where
    A: AccountRepository,
{
    pub async fn execute(&self, input: VerifyCredentialsInput) -> Result<Account, IdentityError> {
        let email = normalize_email(&input.email);

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        // Accounts created through a link or OAuth have no hash. The
        // wire response is identical to a wrong password.
        let Some(hash) = account.password_hash.as_deref() else {
            return Err(IdentityError::NoCredentialsSet);
        };

        let ok = bcrypt::verify(&input.password, hash)
            .map_err(|_| IdentityError::InvalidCredentials)?;
        if !ok {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(account)
    }
}

pub struct ChangePasswordInput {
    pub account_id: Uuid,
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<A>
where
    A: AccountRepository,
{
    pub accounts: A,
}

impl<A> ChangePasswordUseCase<A>
where
    A: AccountRepository,
{
    pub async fn execute(&self, input: ChangePasswordInput) -> Result<(), IdentityError> {
        let account = self
            .accounts
            .find_by_id(input.account_id)
            .await?
            .ok_or(IdentityError::Unauthenticated)?;

        let Some(hash) = account.password_hash.as_deref() else {
            return Err(IdentityError::NoCredentialsSet);
        };
        let ok = bcrypt::verify(&input.current_password, hash)
            .map_err(|_| IdentityError::InvalidCredentials)?;
        if !ok {
            return Err(IdentityError::InvalidCredentials);
        }

        check_password_length(&input.new_password)?;
        let new_hash = hash_password(&input.new_password)?;
        self.accounts.update_password(account.id, &new_hash).await
    }
}
