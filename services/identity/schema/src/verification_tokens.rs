use sea_orm::entity::prelude::*;

/// Single-use secret backing an emailed sign-in link.
/// Redeemed (deleted) at most once; expired rows are reaped periodically.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "verification_tokens")]
pub struct Model {
    /// The opaque token itself. Being the primary key gives at-most-once
    /// redemption its uniqueness guarantee.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    /// Target email the token signs in.
    pub identifier: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
