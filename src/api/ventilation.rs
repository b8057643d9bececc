//! Ventilation device routes.

use axum::{extract::State, routing::get, Json, Router};

use crate::api::{select_single_device, DeviceInfo, DeviceKind};
use crate::http::{ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ventilation/", get(get_ventilation))
        .route("/ventilation/mode", get(get_mode))
        .route("/ventilation/program", get(get_program))
}

async fn get_ventilation(State(state): State<AppState>) -> Result<Json<DeviceInfo>, ApiError> {
    let device = select_single_device(state.devices.as_ref(), DeviceKind::Ventilation).await?;
    Ok(Json(DeviceInfo::from(&device)))
}

async fn active_value(state: &AppState, feature: &str) -> Result<Json<String>, ApiError> {
    let device = select_single_device(state.devices.as_ref(), DeviceKind::Ventilation).await?;
    let features = state.devices.features(&device).await?;
    Ok(Json(features.value(feature, "value")?))
}

async fn get_mode(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    active_value(&state, "ventilation.operating.modes.active").await
}

async fn get_program(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    active_value(&state, "ventilation.operating.programs.active").await
}
