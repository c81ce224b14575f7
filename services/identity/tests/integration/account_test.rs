use parley_identity::error::IdentityError;
use parley_identity::usecase::account::{
    DeleteAccountInput, DeleteAccountUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

use crate::helpers::{MockAccountRepo, credentials_account, oauth_account};

#[tokio::test]
async fn should_update_profile_fields() {
    let account = oauth_account("alice@example.com");
    let repo = MockAccountRepo::new(vec![account.clone()]);
    let handle = repo.handle();

    let uc = UpdateProfileUseCase { accounts: repo };
    let updated = uc
        .execute(UpdateProfileInput {
            account_id: account.id,
            display_name: Some("Alice R.".to_owned()),
            avatar_url: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.display_name.as_deref(), Some("Alice R."));
    assert_eq!(updated.avatar_url, account.avatar_url, "unset field kept");
    assert_eq!(
        handle.lock().unwrap()[0].display_name.as_deref(),
        Some("Alice R.")
    );
}

#[tokio::test]
async fn should_reject_empty_profile_update() {
    let account = oauth_account("alice@example.com");
    let uc = UpdateProfileUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
    };
    let result = uc
        .execute(UpdateProfileInput {
            account_id: account.id,
            display_name: None,
            avatar_url: None,
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidInput(_))));
}

#[tokio::test]
async fn should_delete_credentials_account_with_password_confirmation() {
    let account = credentials_account("alice@example.com", "her password");
    let repo = MockAccountRepo::new(vec![account.clone()]);
    let handle = repo.handle();

    let uc = DeleteAccountUseCase { accounts: repo };
    uc.execute(DeleteAccountInput {
        account_id: account.id,
        password: Some("her password".to_owned()),
    })
    .await
    .unwrap();

    assert!(handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_delete_with_wrong_password() {
    let account = credentials_account("alice@example.com", "her password");
    let repo = MockAccountRepo::new(vec![account.clone()]);
    let handle = repo.handle();

    let uc = DeleteAccountUseCase { accounts: repo };
    let result = uc
        .execute(DeleteAccountInput {
            account_id: account.id,
            password: Some("guess".to_owned()),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    assert_eq!(handle.lock().unwrap().len(), 1, "account survives");
}

#[tokio::test]
async fn should_require_password_to_delete_credentials_account() {
    let account = credentials_account("alice@example.com", "her password");
    let uc = DeleteAccountUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
    };
    let result = uc
        .execute(DeleteAccountInput {
            account_id: account.id,
            password: None,
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_delete_oauth_account_without_password() {
    let account = oauth_account("alice@example.com");
    let repo = MockAccountRepo::new(vec![account.clone()]);
    let handle = repo.handle();

    let uc = DeleteAccountUseCase { accounts: repo };
    uc.execute(DeleteAccountInput {
        account_id: account.id,
        password: None,
    })
    .await
    .unwrap();

    assert!(handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_delete_for_unknown_account() {
    let uc = DeleteAccountUseCase {
        accounts: MockAccountRepo::empty(),
    };
    let result = uc
        .execute(DeleteAccountInput {
            account_id: uuid::Uuid::new_v4(),
            password: None,
        })
        .await;

    assert!(matches!(result, Err(IdentityError::Unauthenticated)));
}
