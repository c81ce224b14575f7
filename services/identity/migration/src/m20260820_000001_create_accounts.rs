use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Email).string().not_null())
                    .col(ColumnDef::new(Accounts::EmailVerified).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::DisplayName).string())
                    .col(ColumnDef::new(Accounts::AvatarUrl).string())
                    .col(ColumnDef::new(Accounts::PasswordHash).string())
                    .col(ColumnDef::new(Accounts::AuthMethod).string().not_null())
                    .col(ColumnDef::new(Accounts::ProviderRef).string())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One account per email, enforced by the store under concurrent
        // registration, never an application-level check-then-insert.
        manager
            .create_index(
                Index::create()
                    .table(Accounts::Table)
                    .col(Accounts::Email)
                    .unique()
                    .name("uq_accounts_email")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Email,
    EmailVerified,
    DisplayName,
    AvatarUrl,
    PasswordHash,
    AuthMethod,
    ProviderRef,
    CreatedAt,
    UpdatedAt,
}
