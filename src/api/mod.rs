//! Device, DHW, ventilation and Loxone routes.
//!
//! # Data Flow
//! ```text
//! Request
//!     → select_single_device (role filter, exactly one match)
//!     → DeviceAccessor::features / execute
//!     → JSON body, or 204 for commands
//! ```
//!
//! # Design Decisions
//! - Path parameters are parsed by hand so invalid values answer 422/404
//!   with a plain-text message instead of an extractor rejection
//! - Input is validated before any vendor call is made

pub mod circuit;
pub mod dhw;
pub mod heatpump;
pub mod loxone;
pub mod ventilation;

use axum::Router;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::http::{ApiError, AppState};
use crate::vendor::{Device, DeviceAccessor};

/// All device and gateway routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(heatpump::routes())
        .merge(circuit::routes(circuit::CircuitMount::Heating))
        .merge(circuit::routes(circuit::CircuitMount::Heatpump))
        .merge(dhw::routes())
        .merge(ventilation::routes())
        .merge(loxone::routes())
}

/// Body of activate/deactivate commands: `"activate"` or `"deactivate"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatingCommand {
    Activate,
    Deactivate,
}

impl HeatingCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeatingCommand::Activate => "activate",
            HeatingCommand::Deactivate => "deactivate",
        }
    }
}

/// Device families a route can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Heating,
    Heatpump,
    Ventilation,
}

impl DeviceKind {
    fn label(&self) -> &'static str {
        match self {
            DeviceKind::Heating => "heating",
            DeviceKind::Heatpump => "heatpump",
            DeviceKind::Ventilation => "ventilation",
        }
    }

    fn matches(&self, device: &Device) -> bool {
        match self {
            DeviceKind::Heating | DeviceKind::Heatpump => device.has_role("type:heatpump"),
            DeviceKind::Ventilation => device.roles.iter().any(|r| r.contains("type:ventilation")),
        }
    }
}

/// The single device of `kind`; none or several answer 422.
pub async fn select_single_device(
    devices: &dyn DeviceAccessor,
    kind: DeviceKind,
) -> Result<Device, ApiError> {
    let mut matching: Vec<Device> = devices
        .devices()
        .await?
        .into_iter()
        .filter(|d| kind.matches(d))
        .collect();

    match matching.len() {
        0 => Err(ApiError::Unprocessable(format!("No {} device found.", kind.label()))),
        1 => Ok(matching.remove(0)),
        _ => Err(ApiError::Unprocessable(format!(
            "Multiple {} devices found, currently unsupported.",
            kind.label()
        ))),
    }
}

/// Identification of a device as served by the info routes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_id: String,
    pub model: String,
    pub serial: String,
    pub status: String,
}

impl From<&Device> for DeviceInfo {
    fn from(device: &Device) -> Self {
        Self {
            device_id: device.id.clone(),
            model: device.model_id.clone(),
            serial: device.gateway_serial.clone(),
            status: device.status.clone(),
        }
    }
}

/// Parse an integer temperature path segment and check its range.
pub fn parse_temperature(raw: &str, range: RangeInclusive<i64>) -> Result<i64, ApiError> {
    let value: i64 = raw.parse().map_err(|_| {
        ApiError::Unprocessable(format!("Temperature must be an integer but was {}.", raw))
    })?;
    if !range.contains(&value) {
        return Err(ApiError::Unprocessable(format!(
            "Temperature must be between {} and {} but was {}.",
            range.start(),
            range.end(),
            value
        )));
    }
    Ok(value)
}

/// 1/0 rendering of a boolean flag; unsupported features stay null.
pub fn flag(value: Option<bool>) -> Option<u8> {
    value.map(u8::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_temperature_bounds_are_inclusive() {
        assert_eq!(parse_temperature("10", 10..=30).unwrap(), 10);
        assert_eq!(parse_temperature("30", 10..=30).unwrap(), 30);
        assert!(matches!(
            parse_temperature("31", 10..=30),
            Err(ApiError::Unprocessable(_))
        ));
        assert!(matches!(
            parse_temperature("warm", 10..=30),
            Err(ApiError::Unprocessable(_))
        ));
    }

    #[test]
    fn test_heating_command_body() {
        let command: HeatingCommand = serde_json::from_str("\"deactivate\"").unwrap();
        assert_eq!(command, HeatingCommand::Deactivate);
        assert!(serde_json::from_str::<HeatingCommand>("\"toggle\"").is_err());
    }

    #[test]
    fn test_ventilation_matches_role_substring() {
        let device = Device {
            installation_id: 1,
            gateway_serial: "7571381681420106".into(),
            id: "0".into(),
            model_id: "E3_ViAir_300F".into(),
            status: "Online".into(),
            roles: vec!["type:ventilation;central".into()],
        };
        assert!(DeviceKind::Ventilation.matches(&device));
        assert!(!DeviceKind::Heatpump.matches(&device));
    }
}
