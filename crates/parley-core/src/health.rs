use axum::http::StatusCode;

/// `GET /healthz`: liveness. Readiness is per service, since each service
/// knows its own startup dependencies.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
