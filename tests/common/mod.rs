//! Shared utilities for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Map, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use async_trait::async_trait;
use vicare_gateway::config::GatewayConfig;
use vicare_gateway::http::{AppState, HttpServer};
use vicare_gateway::lifecycle::Shutdown;
use vicare_gateway::loxone::LoxoneClient;
use vicare_gateway::tracking::{Clock, ManualClock, RequestRecorder};
use vicare_gateway::vendor::{
    Device, DeviceAccessor, Feature, FeatureSet, TokenState, VendorError, VendorResult,
    VendorStatus,
};

/// Vendor session facts controlled by the test.
pub struct FakeVendor {
    token: Mutex<TokenState>,
    session: AtomicBool,
    trust_env: AtomicBool,
    installations: AtomicUsize,
}

impl FakeVendor {
    pub fn new() -> Self {
        Self {
            token: Mutex::new(TokenState::Valid),
            session: AtomicBool::new(true),
            trust_env: AtomicBool::new(true),
            installations: AtomicUsize::new(1),
        }
    }

    pub fn set_token_state(&self, state: TokenState) {
        *self.token.lock().unwrap() = state;
    }

    pub fn set_session_available(&self, available: bool) {
        self.session.store(available, Ordering::SeqCst);
    }

    pub fn set_trust_env(&self, trust: bool) {
        self.trust_env.store(trust, Ordering::SeqCst);
    }
}

impl VendorStatus for FakeVendor {
    fn token_state(&self) -> TokenState {
        *self.token.lock().unwrap()
    }

    fn session_available(&self) -> bool {
        self.session.load(Ordering::SeqCst)
    }

    fn trust_env(&self) -> bool {
        self.trust_env.load(Ordering::SeqCst)
    }

    fn installation_count(&self) -> usize {
        self.installations.load(Ordering::SeqCst)
    }
}

/// A command the gateway sent to the vendor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedCommand {
    pub device_id: String,
    pub feature: String,
    pub command: String,
    pub params: Value,
}

/// In-memory devices sharing one feature set.
pub struct FakeDevices {
    devices: Mutex<Vec<Device>>,
    features: Mutex<FeatureSet>,
    executed: Mutex<Vec<ExecutedCommand>>,
    next_error: Mutex<Option<VendorError>>,
}

impl FakeDevices {
    pub fn new(devices: Vec<Device>, features: Vec<Feature>) -> Self {
        Self {
            devices: Mutex::new(devices),
            features: Mutex::new(FeatureSet::new(features)),
            executed: Mutex::new(Vec::new()),
            next_error: Mutex::new(None),
        }
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        *self.devices.lock().unwrap() = devices;
    }

    pub fn set_features(&self, features: Vec<Feature>) {
        *self.features.lock().unwrap() = FeatureSet::new(features);
    }

    /// Fail the next vendor call with `error`.
    pub fn fail_next(&self, error: VendorError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    pub fn executed(&self) -> Vec<ExecutedCommand> {
        self.executed.lock().unwrap().clone()
    }

    fn take_error(&self) -> VendorResult<()> {
        match self.next_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeviceAccessor for FakeDevices {
    async fn devices(&self) -> VendorResult<Vec<Device>> {
        self.take_error()?;
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn features(&self, _device: &Device) -> VendorResult<FeatureSet> {
        self.take_error()?;
        Ok(self.features.lock().unwrap().clone())
    }

    async fn execute(
        &self,
        device: &Device,
        feature: &str,
        command: &str,
        params: Map<String, Value>,
    ) -> VendorResult<()> {
        self.take_error()?;
        self.features.lock().unwrap().command(feature, command)?;
        self.executed.lock().unwrap().push(ExecutedCommand {
            device_id: device.id.clone(),
            feature: feature.to_string(),
            command: command.to_string(),
            params: Value::Object(params),
        });
        Ok(())
    }
}

pub fn device(id: &str, role: &str) -> Device {
    Device {
        installation_id: 2_012_345,
        gateway_serial: "7571381681420106".into(),
        id: id.into(),
        model_id: "E3_Vitocal".into(),
        status: "Online".into(),
        roles: vec!["capability:monitoring;manufacturer;viessmann".into(), role.into()],
    }
}

pub fn heatpump(id: &str) -> Device {
    device(id, "type:heatpump")
}

pub fn ventilation(id: &str) -> Device {
    device(id, "type:ventilation;central")
}

/// A feature whose properties are given as `name -> value`.
pub fn feature(name: &str, properties: Value, commands: &[&str]) -> Feature {
    let properties: Map<String, Value> = properties
        .as_object()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, json!({ "type": "auto", "value": v })))
        .collect();
    let commands: Map<String, Value> = commands
        .iter()
        .map(|c| {
            (
                c.to_string(),
                json!({
                    "uri": format!("https://api.example.test/features/{}/commands/{}", name, c),
                    "isExecutable": true,
                    "params": {}
                }),
            )
        })
        .collect();

    serde_json::from_value(json!({
        "feature": name,
        "isEnabled": true,
        "properties": properties,
        "commands": commands,
    }))
    .unwrap()
}

/// Features of a heat pump with one circuit and a DHW tank.
pub fn heatpump_features() -> Vec<Feature> {
    let program_commands = ["activate", "deactivate", "setTemperature"];
    let mut main_level = feature(
        "heating.dhw.temperature.main",
        json!({ "value": 50.0 }),
        &["setTargetTemperature"],
    );
    main_level
        .commands
        .get_mut("setTargetTemperature")
        .unwrap()
        .params
        .insert(
            "temperature".into(),
            json!({ "type": "number", "required": true, "constraints": { "min": 10, "max": 60, "stepping": 1 } }),
        );

    vec![
        feature("heating.circuits", json!({ "enabled": ["0"] }), &[]),
        feature(
            "heating.circuits.0.operating.modes.active",
            json!({ "value": "dhwAndHeating" }),
            &["setMode"],
        ),
        feature("heating.circuits.0.operating.programs.active", json!({ "value": "normal" }), &[]),
        feature("heating.circuits.0.operating.programs.comfort", json!({ "active": false }), &program_commands),
        feature("heating.circuits.0.operating.programs.eco", json!({ "active": false }), &["activate", "deactivate"]),
        feature("heating.circuits.0.operating.programs.normal", json!({ "active": true }), &program_commands),
        feature("heating.circuits.0.operating.programs.reduced", json!({ "active": false }), &program_commands),
        feature("heating.sensors.temperature.outside", json!({ "value": 4.5 }), &[]),
        feature("heating.sensors.temperature.return", json!({ "value": 31.2 }), &[]),
        feature("heating.dhw", json!({ "active": true, "status": "on" }), &[]),
        feature("heating.dhw.charging", json!({ "active": false }), &[]),
        main_level,
        feature(
            "heating.dhw.temperature.temp2",
            json!({ "value": 60.0 }),
            &["setTargetTemperature"],
        ),
        feature("heating.dhw.oneTimeCharge", json!({ "active": false }), &["activate", "deactivate"]),
        feature("heating.dhw.pumps.circulation", json!({ "status": "on" }), &[]),
        feature("ventilation.operating.modes.active", json!({ "value": "ventilation" }), &[]),
        feature("ventilation.operating.programs.active", json!({ "value": "levelOne" }), &[]),
    ]
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Gateway state with fakes that the test keeps handles to.
pub struct TestGateway {
    pub state: AppState,
    pub clock: ManualClock,
    pub vendor: Arc<FakeVendor>,
    pub devices: Arc<FakeDevices>,
}

impl TestGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let clock = ManualClock::new(start_time());
        let vendor = Arc::new(FakeVendor::new());
        let devices = Arc::new(FakeDevices::new(vec![heatpump("0")], heatpump_features()));
        let recorder = Arc::new(RequestRecorder::new(
            Arc::new(clock.clone()),
            config.tracking.failure_replacement_secs,
        ));
        let loxone = Arc::new(LoxoneClient::new(config.loxone.clone()).unwrap());
        let state = AppState::new(
            Arc::new(config),
            recorder,
            vendor.clone(),
            devices.clone(),
            loxone,
            Arc::new(clock.clone()),
            clock.now(),
        );
        Self {
            state,
            clock,
            vendor,
            devices,
        }
    }

    pub fn router(&self) -> axum::Router {
        HttpServer::new(self.state.clone()).router()
    }
}

impl Default for TestGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

/// Serve `state` on an ephemeral port until the returned `Shutdown` fires.
pub async fn spawn_server(state: AppState) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();

    tokio::spawn(async move {
        HttpServer::new(state).run(listener, stop).await.unwrap();
    });

    (addr, shutdown)
}
