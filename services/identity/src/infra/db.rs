use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, SqlErr, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use parley_identity_schema::{accounts, outbox_events, verification_tokens};

use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::domain::types::{
    Account, AuthMethod, NewAccount, OutboxEvent, ProfilePatch, VerificationToken,
};
use crate::error::IdentityError;

fn db_err(what: &'static str) -> impl FnOnce(DbErr) -> IdentityError {
    move |e| match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => IdentityError::StoreUnavailable,
        e => anyhow::Error::new(e).context(what).into(),
    }
}

fn txn_err(what: &'static str) -> impl FnOnce(TransactionError<DbErr>) -> IdentityError {
    move |e| match e {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => db_err(what)(e),
    }
}

// ── Account repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: Arc<DatabaseConnection>,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(db_err("find account by email"))?;
        model.map(account_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, IdentityError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(db_err("find account by id"))?;
        model.map(account_from_model).transpose()
    }

    async fn create(&self, account: NewAccount) -> Result<Account, IdentityError> {
        let now = Utc::now();
        let model = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(account.email),
            email_verified: Set(account.email_verified),
            display_name: Set(account.display_name),
            avatar_url: Set(account.avatar_url),
            password_hash: Set(account.password_hash),
            auth_method: Set(account.auth_method.as_str().to_owned()),
            provider_ref: Set(account.provider_ref),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => IdentityError::DuplicateEmail,
            _ => db_err("create account")(e),
        })?;
        account_from_model(model)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: ProfilePatch,
    ) -> Result<Account, IdentityError> {
        let mut active = accounts::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = patch.display_name {
            active.display_name = Set(Some(name));
        }
        if let Some(url) = patch.avatar_url {
            active.avatar_url = Set(Some(url));
        }
        if let Some(provider_ref) = patch.provider_ref {
            active.provider_ref = Set(Some(provider_ref));
        }
        if let Some(verified) = patch.email_verified {
            active.email_verified = Set(Some(verified));
        }

        let model = active.update(&*self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => IdentityError::Unauthenticated,
            e => db_err("update account profile")(e),
        })?;
        account_from_model(model)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), IdentityError> {
        accounts::ActiveModel {
            id: Set(id),
            password_hash: Set(Some(password_hash.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&*self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => IdentityError::Unauthenticated,
            e => db_err("update account password")(e),
        })?;
        Ok(())
    }

    async fn delete_with_owned_data(&self, id: Uuid, email: &str) -> Result<(), IdentityError> {
        let email = email.to_owned();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    verification_tokens::Entity::delete_many()
                        .filter(verification_tokens::Column::Identifier.eq(email))
                        .exec(txn)
                        .await?;
                    accounts::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err("delete account with owned data"))
    }
}

fn account_from_model(model: accounts::Model) -> Result<Account, IdentityError> {
    let auth_method = AuthMethod::parse(&model.auth_method)
        .with_context(|| format!("unknown auth method in store: {}", model.auth_method))?;
    Ok(Account {
        id: model.id,
        email: model.email,
        email_verified: model.email_verified,
        display_name: model.display_name,
        avatar_url: model.avatar_url,
        password_hash: model.password_hash,
        auth_method,
        provider_ref: model.provider_ref,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Verification token repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationTokenRepository {
    pub db: Arc<DatabaseConnection>,
}

impl VerificationTokenRepository for DbVerificationTokenRepository {
    async fn create_with_outbox(
        &self,
        token: VerificationToken,
        event: OutboxEvent,
    ) -> Result<(), IdentityError> {
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    insert_verification_token(txn, &token).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err("create verification token with outbox"))
    }

    async fn take(&self, token: &str) -> Result<Option<VerificationToken>, IdentityError> {
        let token = token.to_owned();
        self.db
            .transaction::<_, Option<VerificationToken>, DbErr>(move |txn| {
                Box::pin(async move {
                    let model = verification_tokens::Entity::find_by_id(token.clone())
                        .one(txn)
                        .await?;
                    let Some(model) = model else {
                        return Ok(None);
                    };
                    // Concurrent redeemers race for this delete; the
                    // loser sees zero rows and reports the token gone.
                    let result = verification_tokens::Entity::delete_by_id(token)
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(None);
                    }
                    Ok(Some(token_from_model(model)))
                })
            })
            .await
            .map_err(txn_err("take verification token"))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, IdentityError> {
        let result = verification_tokens::Entity::delete_many()
            .filter(verification_tokens::Column::ExpiresAt.lte(now))
            .exec(&*self.db)
            .await
            .map_err(db_err("purge expired verification tokens"))?;
        Ok(result.rows_affected)
    }
}

async fn insert_verification_token(
    txn: &DatabaseTransaction,
    token: &VerificationToken,
) -> Result<(), DbErr> {
    verification_tokens::ActiveModel {
        token: Set(token.token.clone()),
        identifier: Set(token.identifier.clone()),
        expires_at: Set(token.expires_at),
        created_at: Set(token.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn token_from_model(model: verification_tokens::Model) -> VerificationToken {
    VerificationToken {
        token: model.token,
        identifier: model.identifier,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}
