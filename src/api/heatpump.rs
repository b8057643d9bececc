//! Heat pump device and temperature sensor routes.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::{select_single_device, DeviceInfo, DeviceKind};
use crate::http::{ApiError, AppState};
use crate::vendor::FeatureSet;

const OUTSIDE_TEMPERATURE: &str = "heating.sensors.temperature.outside";
const RETURN_TEMPERATURE: &str = "heating.sensors.temperature.return";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/heatpump/", get(get_heatpump))
        .route("/heatpump/temperature", get(get_temperature))
        .route("/heatpump/temperature/outside", get(get_temperature_outside))
        .route("/heatpump/temperature/return", get(get_temperature_return))
}

#[derive(Debug, Serialize)]
pub struct Temperatures {
    pub outside: f64,
    #[serde(rename = "return")]
    pub return_: f64,
}

async fn heatpump_features(state: &AppState) -> Result<FeatureSet, ApiError> {
    let device = select_single_device(state.devices.as_ref(), DeviceKind::Heatpump).await?;
    Ok(state.devices.features(&device).await?)
}

async fn get_heatpump(State(state): State<AppState>) -> Result<Json<DeviceInfo>, ApiError> {
    let device = select_single_device(state.devices.as_ref(), DeviceKind::Heatpump).await?;
    Ok(Json(DeviceInfo::from(&device)))
}

async fn get_temperature(State(state): State<AppState>) -> Result<Json<Temperatures>, ApiError> {
    let features = heatpump_features(&state).await?;
    Ok(Json(Temperatures {
        outside: features.value(OUTSIDE_TEMPERATURE, "value")?,
        return_: features.value(RETURN_TEMPERATURE, "value")?,
    }))
}

async fn get_temperature_outside(State(state): State<AppState>) -> Result<Json<f64>, ApiError> {
    let features = heatpump_features(&state).await?;
    Ok(Json(features.value(OUTSIDE_TEMPERATURE, "value")?))
}

async fn get_temperature_return(State(state): State<AppState>) -> Result<Json<f64>, ApiError> {
    let features = heatpump_features(&state).await?;
    Ok(Json(features.value(RETURN_TEMPERATURE, "value")?))
}
