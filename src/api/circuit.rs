//! Heating circuit mode and program routes.
//!
//! Mounted twice, under `/heating/circuit` and `/heatpump/circuit`. Both
//! address the only enabled circuit of the only heat pump. They differ in one
//! answer: an unknown program is 422 under `/heating/circuit` and 404 under
//! `/heatpump/circuit`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde_json::{json, Map, Value};
use std::str::FromStr;

use crate::api::{parse_temperature, select_single_device, DeviceKind, HeatingCommand};
use crate::http::{ApiError, AppState};
use crate::vendor::{Device, FeatureSet};

pub const HEATING_CIRCUIT_PREFIX: &str = "/heating/circuit";
pub const HEATPUMP_CIRCUIT_PREFIX: &str = "/heatpump/circuit";

/// The two mounts of the circuit routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitMount {
    Heating,
    Heatpump,
}

impl CircuitMount {
    pub fn prefix(&self) -> &'static str {
        match self {
            CircuitMount::Heating => HEATING_CIRCUIT_PREFIX,
            CircuitMount::Heatpump => HEATPUMP_CIRCUIT_PREFIX,
        }
    }

    /// Parse a program path segment with this mount's unknown-program status.
    pub fn parse_program(&self, raw: &str) -> Result<CircuitProgram, ApiError> {
        match (self, raw.parse::<CircuitProgram>()) {
            (CircuitMount::Heating, Err(ApiError::NotFound(message))) => {
                Err(ApiError::Unprocessable(message))
            }
            (_, parsed) => parsed,
        }
    }
}

pub fn routes(mount: CircuitMount) -> Router<AppState> {
    let prefix = mount.prefix();
    Router::new()
        .route(&format!("{}/mode", prefix), get(get_mode))
        .route(&format!("{}/mode/{{mode}}", prefix), put(set_mode))
        .route(&format!("{}/program", prefix), get(get_program))
        .route(&format!("{}/program/{{program}}", prefix), put(set_program))
        .route(
            &format!("{}/program/{{program}}/{{temperature}}", prefix),
            put(set_program_temperature),
        )
        .layer(Extension(mount))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitMode {
    Dhw,
    DhwAndHeating,
    Standby,
}

impl CircuitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitMode::Dhw => "dhw",
            CircuitMode::DhwAndHeating => "dhwAndHeating",
            CircuitMode::Standby => "standby",
        }
    }
}

impl FromStr for CircuitMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dhw" => Ok(CircuitMode::Dhw),
            "dhwAndHeating" => Ok(CircuitMode::DhwAndHeating),
            "standby" => Ok(CircuitMode::Standby),
            other => Err(ApiError::Unprocessable(format!(
                "Mode must be one of dhw, dhwAndHeating, standby but was {}.",
                other
            ))),
        }
    }
}

/// Circuit programs. `Default` is a pseudo program: activating it
/// deactivates every other manually settable program, which returns the
/// circuit to its time table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitProgram {
    Comfort,
    Default,
    Eco,
    Normal,
    Reduced,
}

impl CircuitProgram {
    pub const ALL: [CircuitProgram; 5] = [
        CircuitProgram::Comfort,
        CircuitProgram::Default,
        CircuitProgram::Eco,
        CircuitProgram::Normal,
        CircuitProgram::Reduced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitProgram::Comfort => "comfort",
            CircuitProgram::Default => "default",
            CircuitProgram::Eco => "eco",
            CircuitProgram::Normal => "normal",
            CircuitProgram::Reduced => "reduced",
        }
    }

    pub fn manually_settable(&self) -> bool {
        matches!(
            self,
            CircuitProgram::Comfort | CircuitProgram::Eco | CircuitProgram::Default
        )
    }

    pub fn temperature_settable(&self) -> bool {
        matches!(
            self,
            CircuitProgram::Comfort | CircuitProgram::Normal | CircuitProgram::Reduced
        )
    }

    fn names(filter: impl Fn(&CircuitProgram) -> bool) -> String {
        Self::ALL
            .iter()
            .filter(|p| filter(p))
            .map(CircuitProgram::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for CircuitProgram {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "Program must be one of {} but was {}.",
                    Self::names(|_| true),
                    s
                ))
            })
    }
}

/// The selected circuit of the heat pump.
struct Circuit {
    device: Device,
    features: FeatureSet,
    id: String,
}

impl Circuit {
    fn feature(&self, suffix: &str) -> String {
        format!("heating.circuits.{}.{}", self.id, suffix)
    }

    fn program_feature(&self, program: CircuitProgram) -> String {
        self.feature(&format!("operating.programs.{}", program.as_str()))
    }
}

async fn single_circuit(state: &AppState) -> Result<Circuit, ApiError> {
    let device = select_single_device(state.devices.as_ref(), DeviceKind::Heatpump).await?;
    let features = state.devices.features(&device).await?;
    let mut ids: Vec<String> = features
        .optional("heating.circuits", "enabled")?
        .unwrap_or_default();

    match ids.len() {
        0 => Err(ApiError::Unprocessable("No circuit device found.".into())),
        1 => Ok(Circuit {
            device,
            features,
            id: ids.remove(0),
        }),
        _ => Err(ApiError::Unprocessable(
            "Multiple circuits found, currently unsupported.".into(),
        )),
    }
}

async fn execute(
    state: &AppState,
    circuit: &Circuit,
    feature: String,
    command: &str,
    params: Map<String, Value>,
) -> Result<(), ApiError> {
    state
        .devices
        .execute(&circuit.device, &feature, command, params)
        .await?;
    Ok(())
}

async fn get_mode(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    let circuit = single_circuit(&state).await?;
    let mode = circuit
        .features
        .value(&circuit.feature("operating.modes.active"), "value")?;
    Ok(Json(mode))
}

async fn set_mode(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mode: CircuitMode = mode.parse()?;
    let circuit = single_circuit(&state).await?;
    let params = Map::from_iter([("mode".to_string(), json!(mode.as_str()))]);
    execute(&state, &circuit, circuit.feature("operating.modes.active"), "setMode", params).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_program(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    let circuit = single_circuit(&state).await?;
    let program = circuit
        .features
        .value(&circuit.feature("operating.programs.active"), "value")?;
    Ok(Json(program))
}

async fn set_program(
    State(state): State<AppState>,
    Extension(mount): Extension<CircuitMount>,
    Path(program): Path<String>,
    Json(command): Json<HeatingCommand>,
) -> Result<StatusCode, ApiError> {
    let program = mount.parse_program(&program)?;
    if !program.manually_settable() {
        return Err(ApiError::NotAllowed(format!(
            "Can only activate {} manually.",
            CircuitProgram::names(CircuitProgram::manually_settable)
        )));
    }
    if program == CircuitProgram::Default && command == HeatingCommand::Deactivate {
        return Err(ApiError::NotAllowed(
            "Can only activate pseudo program 'default', but not deactivate.".into(),
        ));
    }

    let circuit = single_circuit(&state).await?;
    if program == CircuitProgram::Default {
        for other in CircuitProgram::ALL
            .into_iter()
            .filter(|p| p.manually_settable() && *p != CircuitProgram::Default)
        {
            let feature = circuit.program_feature(other);
            execute(&state, &circuit, feature, "deactivate", Map::new()).await?;
        }
    } else {
        let feature = circuit.program_feature(program);
        execute(&state, &circuit, feature, command.as_str(), Map::new()).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn set_program_temperature(
    State(state): State<AppState>,
    Extension(mount): Extension<CircuitMount>,
    Path((program, temperature)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let temperature = parse_temperature(&temperature, 10..=30)?;
    let program = mount.parse_program(&program)?;
    if !program.temperature_settable() {
        return Err(ApiError::NotAllowed(format!(
            "Can only set temperature of {} manually.",
            CircuitProgram::names(CircuitProgram::temperature_settable)
        )));
    }

    let circuit = single_circuit(&state).await?;
    let params = Map::from_iter([("targetTemperature".to_string(), json!(temperature))]);
    let feature = circuit.program_feature(program);
    execute(&state, &circuit, feature, "setTemperature", params).await?;
    Ok(StatusCode::NO_CONTENT)
}
