use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use parley_core::health::healthz;
use parley_core::middleware::request_id_layer;

use crate::handlers::{
    account::delete_account,
    credentials::{change_password, login, register},
    health::readyz,
    oauth::oauth_callback,
    providers::list_providers,
    session::{get_session, logout, patch_profile, refresh_session},
    signin_link::{redeem_signin_link, request_signin_link},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Credentials
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/password", post(change_password))
        // Sign-in links
        .route("/auth/email", post(request_signin_link))
        .route("/auth/email/redeem", post(redeem_signin_link))
        // OAuth
        .route("/auth/oauth/callback", post(oauth_callback))
        // Session
        .route("/auth/session", get(get_session))
        .route("/auth/session", patch(refresh_session))
        .route("/auth/session", delete(logout))
        .route("/auth/session/profile", patch(patch_profile))
        // Account
        .route("/auth/account", delete(delete_account))
        // Discovery
        .route("/auth/providers", get(list_providers))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
