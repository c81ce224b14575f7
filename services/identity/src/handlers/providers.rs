use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<&'static str>,
}

// ── GET /auth/providers ───────────────────────────────────────────────────────

/// Discovery endpoint so the client can render only the sign-in
/// buttons this deployment actually supports.
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.providers.names(),
    })
}
