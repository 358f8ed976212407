use crate::model::HealthResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

/// Always answers 200; `ok` tells whether the store responded.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: state.pastebin().healthy().await,
    })
}
