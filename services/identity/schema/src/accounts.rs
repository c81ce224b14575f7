use sea_orm::entity::prelude::*;

/// Canonical user identity, one row per email (unique index).
/// Every sign-in provider reconciles onto this record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Normalized (lower-cased, trimmed) at write time.
    #[sea_orm(unique)]
    pub email: String,
    /// Set when an email link or OAuth provider asserted a verified address.
    pub email_verified: Option<chrono::DateTime<chrono::Utc>>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// bcrypt hash; present only when `auth_method` is `credentials`.
    pub password_hash: Option<String>,
    /// The method that created the account ("credentials" | "email-link" |
    /// "oauth"). Never mutated after creation.
    pub auth_method: String,
    /// External provider account id, informational, OAuth accounts only.
    pub provider_ref: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
