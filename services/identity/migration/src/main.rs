use sea_orm_migration::prelude::*;

mod m20260820_000001_create_accounts;
mod m20260820_000002_create_verification_tokens;
mod m20260820_000003_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260820_000001_create_accounts::Migration),
            Box::new(m20260820_000002_create_verification_tokens::Migration),
            Box::new(m20260820_000003_create_outbox_events::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
