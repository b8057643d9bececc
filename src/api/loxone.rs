//! Loxone Miniserver routes.

use axum::{extract::State, routing::get, Json, Router};

use crate::http::{ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/loxone/mode/sleep/state", get(get_sleep_mode))
}

async fn get_sleep_mode(State(state): State<AppState>) -> Result<Json<bool>, ApiError> {
    Ok(Json(state.loxone.sleep_mode().await?))
}
