use parley_identity::domain::types::AuthMethod;
use parley_identity::error::IdentityError;
use parley_identity::usecase::credentials::{
    ChangePasswordInput, ChangePasswordUseCase, RegisterInput, RegisterUseCase,
    VerifyCredentialsInput, VerifyCredentialsUseCase,
};

use crate::helpers::{MockAccountRepo, credentials_account, oauth_account};

#[tokio::test]
async fn should_register_account_with_hashed_password() {
    let repo = MockAccountRepo::empty();
    let handle = repo.handle();

    let uc = RegisterUseCase { accounts: repo };
    let account = uc
        .execute(RegisterInput {
            email: "  Alice@Example.COM ".to_owned(),
            password: "correct horse".to_owned(),
            display_name: Some("Alice".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(account.email, "alice@example.com", "email is normalized");
    assert_eq!(account.auth_method, AuthMethod::Credentials);
    assert!(account.email_verified.is_none(), "self-asserted email");

    let accounts = handle.lock().unwrap();
    assert_eq!(accounts.len(), 1);
    let stored_hash = accounts[0].password_hash.as_deref().unwrap();
    assert_ne!(stored_hash, "correct horse", "never stored in clear");
    assert!(bcrypt::verify("correct horse", stored_hash).unwrap());
}

#[tokio::test]
async fn should_reject_duplicate_email_on_register() {
    let uc = RegisterUseCase {
        accounts: MockAccountRepo::new(vec![credentials_account("alice@example.com", "pw-first1")]),
    };
    let result = uc
        .execute(RegisterInput {
            email: "ALICE@example.com".to_owned(),
            password: "pw-second2".to_owned(),
            display_name: None,
        })
        .await;

    assert!(
        matches!(result, Err(IdentityError::DuplicateEmail)),
        "expected DuplicateEmail, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_short_password_on_register() {
    let uc = RegisterUseCase {
        accounts: MockAccountRepo::empty(),
    };
    let result = uc
        .execute(RegisterInput {
            email: "alice@example.com".to_owned(),
            password: "short".to_owned(),
            display_name: None,
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidInput(_))));
}

#[tokio::test]
async fn should_login_with_correct_password() {
    let account = credentials_account("alice@example.com", "correct horse");
    let uc = VerifyCredentialsUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
    };

    let verified = uc
        .execute(VerifyCredentialsInput {
            email: "Alice@Example.com".to_owned(),
            password: "correct horse".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(verified.id, account.id);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let uc = VerifyCredentialsUseCase {
        accounts: MockAccountRepo::new(vec![credentials_account("alice@example.com", "correct")]),
    };
    let result = uc
        .execute(VerifyCredentialsInput {
            email: "alice@example.com".to_owned(),
            password: "wrong".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_unknown_email() {
    let uc = VerifyCredentialsUseCase {
        accounts: MockAccountRepo::empty(),
    };
    let result = uc
        .execute(VerifyCredentialsInput {
            email: "nobody@example.com".to_owned(),
            password: "whatever1".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_flag_password_login_against_passwordless_account() {
    // Created via OAuth, no hash on record. The wire response is the
    // same as a wrong password; only the internal kind differs.
    let uc = VerifyCredentialsUseCase {
        accounts: MockAccountRepo::new(vec![oauth_account("alice@example.com")]),
    };
    let result = uc
        .execute(VerifyCredentialsInput {
            email: "alice@example.com".to_owned(),
            password: "anything1".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(IdentityError::NoCredentialsSet)),
        "expected NoCredentialsSet, got {result:?}"
    );
}

#[tokio::test]
async fn should_change_password_after_verifying_current() {
    let account = credentials_account("alice@example.com", "old password");
    let repo = MockAccountRepo::new(vec![account.clone()]);
    let handle = repo.handle();

    let uc = ChangePasswordUseCase { accounts: repo };
    uc.execute(ChangePasswordInput {
        account_id: account.id,
        current_password: "old password".to_owned(),
        new_password: "new password".to_owned(),
    })
    .await
    .unwrap();

    let accounts = handle.lock().unwrap();
    let stored_hash = accounts[0].password_hash.as_deref().unwrap();
    assert!(bcrypt::verify("new password", stored_hash).unwrap());
    assert!(!bcrypt::verify("old password", stored_hash).unwrap());
}

#[tokio::test]
async fn should_reject_password_change_with_wrong_current() {
    let account = credentials_account("alice@example.com", "old password");
    let uc = ChangePasswordUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
    };
    let result = uc
        .execute(ChangePasswordInput {
            account_id: account.id,
            current_password: "not the password".to_owned(),
            new_password: "new password".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}
