use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

// ── GET /readyz ───────────────────────────────────────────────────────────────

/// Ready only when the account store answers a ping; a booted process
/// that cannot reach Postgres must not receive traffic.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
