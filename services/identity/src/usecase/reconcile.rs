use chrono::Utc;

use crate::domain::repository::AccountRepository;
use crate::domain::types::{
    Account, NewAccount, ProfilePatch, SignInAttempt, is_plausible_email, normalize_email,
};
use crate::error::IdentityError;

/// Maps a provider-asserted identity onto the account store. Every
/// sign-in path (credentials, email link, OAuth) funnels through here
/// so there is exactly one account per email regardless of method.
pub struct ReconcileSignInUseCase<A>
where
    A: AccountRepository,
{
    pub accounts: A,
}

impl<A> ReconcileSignInUseCase<A>
where
    A: AccountRepository,
{
    pub async fn execute(&self, attempt: SignInAttempt) -> Result<Account, IdentityError> {
        let email = normalize_email(&attempt.email);
        if !is_plausible_email(&email) {
            return Err(IdentityError::UnverifiableIdentity);
        }

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            // First sign-in with this email: the attempt becomes the account.
            return self
                .accounts
                .create(NewAccount {
                    email,
                    email_verified: attempt.verified_by_provider.then(Utc::now),
                    display_name: attempt.profile.name,
                    avatar_url: attempt.profile.avatar_url,
                    password_hash: None,
                    auth_method: attempt.method,
                    provider_ref: attempt.provider_ref,
                })
                .await;
        };

        if account.auth_method != attempt.method {
            // Cross-method sign-in onto an existing account: accept it,
            // mutate nothing. The stored profile stays authoritative.
            return Ok(account);
        }

        // Same method: refresh the profile fields the provider asserts,
        // skipping anything that already matches.
        let mut patch = ProfilePatch::default();
        if attempt.profile.name.is_some() && attempt.profile.name != account.display_name {
            patch.display_name = attempt.profile.name;
        }
        if attempt.profile.avatar_url.is_some() && attempt.profile.avatar_url != account.avatar_url
        {
            patch.avatar_url = attempt.profile.avatar_url;
        }
        if attempt.provider_ref.is_some() && attempt.provider_ref != account.provider_ref {
            patch.provider_ref = attempt.provider_ref;
        }
        if account.email_verified.is_none() && attempt.verified_by_provider {
            patch.email_verified = Some(Utc::now());
        }

        if patch.is_empty() {
            return Ok(account);
        }
        self.accounts.update_profile(account.id, patch).await
    }
}
