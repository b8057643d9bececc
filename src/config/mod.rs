//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (dotenvy) + config file (TOML)
//!     → loader.rs (parse, deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Secrets may come from the environment instead of the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::HealthConfig;
pub use schema::ListenerConfig;
pub use schema::LoxoneConfig;
pub use schema::ObservabilityConfig;
pub use schema::TrackingConfig;
pub use schema::ViCareConfig;
