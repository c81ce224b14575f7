use chrono::{Duration, Utc};

use parley_identity::domain::types::{
    AuthMethod, SIGNIN_TOKEN_LEN, SignInAttempt, SignInProfile, VerificationToken,
};
use parley_identity::error::IdentityError;
use parley_identity::usecase::reconcile::ReconcileSignInUseCase;
use parley_identity::usecase::signin_link::{
    IssueSignInLinkInput, IssueSignInLinkUseCase, RedeemSignInLinkInput, RedeemSignInLinkUseCase,
};

use crate::helpers::{MockAccountRepo, MockTokenRepo};

fn pending_token(token: &str, email: &str) -> VerificationToken {
    let now = Utc::now();
    VerificationToken {
        token: token.to_owned(),
        identifier: email.to_owned(),
        expires_at: now + Duration::minutes(15),
        created_at: now,
    }
}

#[tokio::test]
async fn should_issue_token_with_delivery_event() {
    let repo = MockTokenRepo::empty();
    let tokens = repo.tokens_handle();
    let events = repo.events_handle();

    let uc = IssueSignInLinkUseCase {
        tokens: repo,
        public_url: "https://parley.example.com/".to_owned(),
    };
    uc.execute(IssueSignInLinkInput {
        email: "Alice@Example.com".to_owned(),
    })
    .await
    .unwrap();

    let tokens = tokens.lock().unwrap();
    assert_eq!(tokens.len(), 1);
    let token = &tokens[0];
    assert_eq!(token.token.len(), SIGNIN_TOKEN_LEN);
    assert_eq!(token.identifier, "alice@example.com", "email is normalized");
    assert!(token.expires_at > Utc::now());

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.kind, "signin_link_issued");
    assert_eq!(
        event.idempotency_key,
        format!("signin_link_issued:{}", token.token)
    );
    let url = event.payload["url"].as_str().unwrap();
    assert_eq!(
        url,
        format!(
            "https://parley.example.com/auth/email/redeem?token={}",
            token.token
        )
    );
}

#[tokio::test]
async fn should_reject_implausible_email_on_issue() {
    let uc = IssueSignInLinkUseCase {
        tokens: MockTokenRepo::empty(),
        public_url: "https://parley.example.com".to_owned(),
    };
    let result = uc
        .execute(IssueSignInLinkInput {
            email: "no-at-sign".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidInput(_))));
}

#[tokio::test]
async fn should_redeem_token_exactly_once() {
    let repo = MockTokenRepo::new(vec![pending_token("TOK", "alice@example.com")]);
    let tokens = repo.tokens_handle();

    let uc = RedeemSignInLinkUseCase { tokens: repo };

    let email = uc
        .execute(RedeemSignInLinkInput {
            token: "TOK".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(email, "alice@example.com");
    assert!(tokens.lock().unwrap().is_empty(), "consumed on redemption");

    let replay = uc
        .execute(RedeemSignInLinkInput {
            token: "TOK".to_owned(),
        })
        .await;
    assert!(
        matches!(replay, Err(IdentityError::InvalidOrExpiredToken)),
        "expected InvalidOrExpiredToken on replay, got {replay:?}"
    );
}

#[tokio::test]
async fn should_reject_and_consume_expired_token() {
    let mut token = pending_token("TOK", "alice@example.com");
    token.expires_at = Utc::now() - Duration::seconds(1);
    let repo = MockTokenRepo::new(vec![token]);
    let tokens = repo.tokens_handle();

    let uc = RedeemSignInLinkUseCase { tokens: repo };
    let result = uc
        .execute(RedeemSignInLinkInput {
            token: "TOK".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidOrExpiredToken)));
    assert!(
        tokens.lock().unwrap().is_empty(),
        "expired token is consumed, not left for retries"
    );
}

#[tokio::test]
async fn should_reject_unknown_token() {
    let uc = RedeemSignInLinkUseCase {
        tokens: MockTokenRepo::empty(),
    };
    let result = uc
        .execute(RedeemSignInLinkInput {
            token: "NOPE".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidOrExpiredToken)));
}

#[tokio::test]
async fn should_sign_up_new_account_through_emailed_link() {
    // Issue, redeem, reconcile: the full first-contact flow for an
    // email that has never been seen before.
    let token_repo = MockTokenRepo::empty();
    let tokens = token_repo.tokens_handle();

    let issue = IssueSignInLinkUseCase {
        tokens: token_repo.clone(),
        public_url: "https://parley.example.com".to_owned(),
    };
    issue
        .execute(IssueSignInLinkInput {
            email: "new@example.com".to_owned(),
        })
        .await
        .unwrap();

    let token = tokens.lock().unwrap()[0].token.clone();

    let redeem = RedeemSignInLinkUseCase { tokens: token_repo };
    let email = redeem
        .execute(RedeemSignInLinkInput { token })
        .await
        .unwrap();

    let account_repo = MockAccountRepo::empty();
    let reconcile = ReconcileSignInUseCase {
        accounts: account_repo.clone(),
    };
    let account = reconcile
        .execute(SignInAttempt {
            email,
            method: AuthMethod::EmailLink,
            verified_by_provider: true,
            profile: SignInProfile::default(),
            provider_ref: None,
        })
        .await
        .unwrap();

    assert_eq!(account.email, "new@example.com");
    assert_eq!(account.auth_method, AuthMethod::EmailLink);
    assert!(
        account.email_verified.is_some(),
        "redeeming the link proves mailbox ownership"
    );
    assert!(account.password_hash.is_none());
}

#[tokio::test]
async fn should_purge_only_expired_tokens() {
    let mut stale = pending_token("STALE", "a@example.com");
    stale.expires_at = Utc::now() - Duration::minutes(1);
    let fresh = pending_token("FRESH", "b@example.com");
    let repo = MockTokenRepo::new(vec![stale, fresh]);

    use parley_identity::domain::repository::VerificationTokenRepository;
    let purged = repo.purge_expired(Utc::now()).await.unwrap();

    assert_eq!(purged, 1);
    let remaining = repo.tokens_handle();
    let remaining = remaining.lock().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].token, "FRESH");
}
