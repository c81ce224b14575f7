use uuid::Uuid;

use crate::domain::repository::AccountRepository;
use crate::domain::types::{Account, AuthMethod, ProfilePatch};
use crate::error::IdentityError;

pub struct UpdateProfileInput {
    pub account_id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct UpdateProfileUseCase<A>
where
    A: AccountRepository,
{
    pub accounts: A,
}

impl<A> UpdateProfileUseCase<A>
where
    A: AccountRepository,
{
    pub async fn execute(&self, input: UpdateProfileInput) -> Result<Account, IdentityError> {
        let patch = ProfilePatch {
            display_name: input.display_name,
            avatar_url: input.avatar_url,
            ..Default::default()
        };
        if patch.is_empty() {
            return Err(IdentityError::InvalidInput("nothing to update".to_owned()));
        }
        self.accounts.update_profile(input.account_id, patch).await
    }
}

pub struct DeleteAccountInput {
    pub account_id: Uuid,
    /// Required for credentials accounts; ignored otherwise.
    pub password: Option<String>,
}

pub struct DeleteAccountUseCase<A>
where
    A: AccountRepository,
{
    pub accounts: A,
}

impl<A> DeleteAccountUseCase<A>
where
    A: AccountRepository,
{
    pub async fn execute(&self, input: DeleteAccountInput) -> Result<(), IdentityError> {
        let account = self
            .accounts
            .find_by_id(input.account_id)
            .await?
            .ok_or(IdentityError::Unauthenticated)?;

        // Credentials accounts confirm with the current password before
        // anything is removed.
        if account.auth_method == AuthMethod::Credentials {
            let hash = account
                .password_hash
                .as_deref()
                .ok_or(IdentityError::NoCredentialsSet)?;
            let password = input
                .password
                .as_deref()
                .ok_or(IdentityError::InvalidCredentials)?;
            let ok =
                bcrypt::verify(password, hash).map_err(|_| IdentityError::InvalidCredentials)?;
            if !ok {
                return Err(IdentityError::InvalidCredentials);
            }
        }

        self.accounts
            .delete_with_owned_data(account.id, &account.email)
            .await
    }
}
