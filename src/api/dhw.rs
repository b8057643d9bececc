//! Domestic hot water (DHW) routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};
use std::collections::HashMap;
use std::str::FromStr;

use crate::api::{flag, parse_temperature, select_single_device, DeviceKind, HeatingCommand};
use crate::http::{ApiError, AppState};

const DHW: &str = "heating.dhw";
const DHW_CHARGING: &str = "heating.dhw.charging";
const DHW_TEMPERATURE_MAIN: &str = "heating.dhw.temperature.main";
const DHW_TEMPERATURE_TEMP2: &str = "heating.dhw.temperature.temp2";
const DHW_ONE_TIME_CHARGE: &str = "heating.dhw.oneTimeCharge";
const DHW_CIRCULATION: &str = "heating.dhw.pumps.circulation";
const DHW_CIRCULATION_SCHEDULE: &str = "heating.dhw.pumps.circulation.schedule";
const DHW_STORAGE_TEMPERATURE: &str = "heating.dhw.sensors.temperature.hotWaterStorage";

const SET_TARGET_TEMPERATURE: &str = "setTargetTemperature";
const SCHEDULE_DEFAULT_MODE: &str = "off";
const SCHEDULE_TEMP2_MODE: &str = "temp-2";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/heating/dhw", get(get_dhw))
        .route("/heating/dhw/onetimecharge", put(set_one_time_charge))
        .route("/heating/dhw/level/{level}/{temperature}", put(set_level_temperature))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhwLevel {
    Main,
    Temp2,
}

impl DhwLevel {
    fn feature(&self) -> &'static str {
        match self {
            DhwLevel::Main => DHW_TEMPERATURE_MAIN,
            DhwLevel::Temp2 => DHW_TEMPERATURE_TEMP2,
        }
    }
}

impl FromStr for DhwLevel {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(DhwLevel::Main),
            "temp2" => Ok(DhwLevel::Temp2),
            other => Err(ApiError::Unprocessable(format!(
                "Level must be one of main, temp2 but was {}.",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhwStatus {
    pub active: Option<u8>,
    pub charging_active: Option<u8>,
    pub levels: DhwLevels,
    pub one_time_charge: Option<u8>,
    pub pumps: DhwPumps,
    pub storage_temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DhwLevels {
    pub main: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub temp2: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhwPumps {
    pub circulation_active: Option<u8>,
    pub mode: Option<String>,
}

/// One switching period of the circulation pump time table.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleEntry {
    pub start: String,
    pub end: String,
    pub mode: String,
}

/// Time table keyed by `mon` .. `sun`.
pub type WeekSchedule = HashMap<String, Vec<ScheduleEntry>>;

fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Seconds since midnight of an `HH:MM` time; `24:00` is end of day.
fn parse_clock_time(raw: &str) -> Option<u32> {
    let (hours, minutes) = raw.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 24 || minutes > 59 || (hours == 24 && minutes > 0) {
        return None;
    }
    Some(hours * 3600 + minutes * 60)
}

/// Circulation pump mode at `at` according to the time table.
///
/// An inactive table yields `None`, a day without a matching period the
/// default mode. A `temp-2` period wins over any overlapping period.
pub fn circulation_mode(active: bool, schedule: &WeekSchedule, at: NaiveDateTime) -> Option<String> {
    if !active {
        return None;
    }
    let periods = schedule.get(weekday_key(at.weekday()))?;
    let now = at.num_seconds_from_midnight();

    let mut mode = None;
    for period in periods {
        let (Some(start), Some(end)) = (parse_clock_time(&period.start), parse_clock_time(&period.end))
        else {
            continue;
        };
        if start <= now && now <= end {
            if period.mode == SCHEDULE_TEMP2_MODE {
                return Some(period.mode.clone());
            }
            mode = Some(period.mode.clone());
        }
    }
    Some(mode.unwrap_or_else(|| SCHEDULE_DEFAULT_MODE.to_string()))
}

async fn get_dhw(State(state): State<AppState>) -> Result<Json<DhwStatus>, ApiError> {
    let device = select_single_device(state.devices.as_ref(), DeviceKind::Heating).await?;
    let features = state.devices.features(&device).await?;

    let circulation_active = features
        .optional::<String>(DHW_CIRCULATION, "status")?
        .map(|status| status == "on");
    let schedule_active = features.optional::<bool>(DHW_CIRCULATION_SCHEDULE, "active")?;
    let schedule = features.optional::<WeekSchedule>(DHW_CIRCULATION_SCHEDULE, "entries")?;
    let local_now = state.clock.now().with_timezone(&Local).naive_local();
    let mode = match (schedule_active, schedule) {
        (Some(active), Some(schedule)) => circulation_mode(active, &schedule, local_now),
        _ => None,
    };

    Ok(Json(DhwStatus {
        active: flag(features.optional(DHW, "active")?),
        charging_active: flag(features.optional(DHW_CHARGING, "active")?),
        levels: DhwLevels {
            main: features.optional(DHW_TEMPERATURE_MAIN, "value")?,
            max: features.constraint(DHW_TEMPERATURE_MAIN, SET_TARGET_TEMPERATURE, "temperature", "max"),
            min: features.constraint(DHW_TEMPERATURE_MAIN, SET_TARGET_TEMPERATURE, "temperature", "min"),
            temp2: features.optional(DHW_TEMPERATURE_TEMP2, "value")?,
        },
        one_time_charge: flag(features.optional(DHW_ONE_TIME_CHARGE, "active")?),
        pumps: DhwPumps {
            circulation_active: flag(circulation_active),
            mode,
        },
        storage_temperature: features.optional(DHW_STORAGE_TEMPERATURE, "value")?,
    }))
}

async fn set_one_time_charge(
    State(state): State<AppState>,
    Json(command): Json<HeatingCommand>,
) -> Result<StatusCode, ApiError> {
    let device = select_single_device(state.devices.as_ref(), DeviceKind::Heating).await?;
    state
        .devices
        .execute(&device, DHW_ONE_TIME_CHARGE, command.as_str(), Map::new())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_level_temperature(
    State(state): State<AppState>,
    Path((level, temperature)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let level: DhwLevel = level.parse()?;
    let temperature = parse_temperature(&temperature, 10..=60)?;

    let device = select_single_device(state.devices.as_ref(), DeviceKind::Heating).await?;
    let params = Map::from_iter([("temperature".to_string(), json!(temperature))]);
    state
        .devices
        .execute(&device, level.feature(), SET_TARGET_TEMPERATURE, params)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
