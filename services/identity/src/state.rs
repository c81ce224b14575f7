use std::sync::Arc;

use sea_orm::DatabaseConnection;

use parley_session::extract::SessionSecret;

use crate::config::ProviderRegistry;
use crate::infra::db::{DbAccountRepository, DbVerificationTokenRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub session_secret: String,
    pub cookie_domain: String,
    pub public_url: String,
    pub providers: Arc<ProviderRegistry>,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_token_repo(&self) -> DbVerificationTokenRepository {
        DbVerificationTokenRepository {
            db: self.db.clone(),
        }
    }
}

impl SessionSecret for AppState {
    fn session_secret(&self) -> &str {
        &self.session_secret
    }
}
