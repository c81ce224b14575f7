use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sea_orm::Database;
use tracing::{info, warn};

use parley_core::tracing::init_tracing;
use parley_identity::config::IdentityConfig;
use parley_identity::domain::repository::VerificationTokenRepository;
use parley_identity::router::build_router;
use parley_identity::state::AppState;

/// How often expired sign-in tokens are swept from the store.
const TOKEN_REAPER_INTERVAL_SECS: u64 = 600;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = IdentityConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db: Arc::new(db),
        session_secret: config.session_secret,
        cookie_domain: config.cookie_domain,
        public_url: config.public_url,
        providers: Arc::new(config.providers),
    };

    // Expired tokens are rejected at redemption regardless; the reaper
    // just keeps the table from growing without bound.
    let reaper_repo = state.verification_token_repo();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(TOKEN_REAPER_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match reaper_repo.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(n) => info!(count = n, "purged expired sign-in tokens"),
                Err(e) => warn!(error = %e, "sign-in token purge failed"),
            }
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.identity_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("identity service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
