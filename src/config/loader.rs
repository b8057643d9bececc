//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Environment variables that override file settings.
pub const ENV_OVERRIDES: [&str; 5] = [
    "CLIENT_ID",
    "VICARE_TOKEN_PATH",
    "LOXONE_URL",
    "LOXONE_USER",
    "LOXONE_PASSWORD",
];

/// Load configuration: TOML file (optional), then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => GatewayConfig::default(),
    };
    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse TOML content without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Apply overrides from `lookup` (usually the process environment).
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> GatewayConfig
where
    F: Fn(&str) -> Option<String>,
{
    for key in ENV_OVERRIDES {
        let Some(value) = lookup(key) else { continue };
        let target = match key {
            "CLIENT_ID" => &mut config.vicare.client_id,
            "VICARE_TOKEN_PATH" => &mut config.vicare.token_path,
            "LOXONE_URL" => &mut config.loxone.url,
            "LOXONE_USER" => &mut config.loxone.user,
            "LOXONE_PASSWORD" => &mut config.loxone.password,
            _ => continue,
        };
        *target = value;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [health]
            failure_scoring_secs = 600
            "#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.health.failure_scoring_secs, 600);
        assert_eq!(config.tracking.failure_replacement_secs, 3600);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_values_are_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tracking]\nfailure_replacement_secs = 0").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("tracking.failure_replacement_secs"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(parse_config("[listener"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CLIENT_ID", "env-client"),
            ("LOXONE_URL", "http://127.0.0.1"),
            ("LOXONE_USER", "reader"),
        ]);
        let mut config = GatewayConfig::default();
        config.vicare.client_id = "file-client".into();
        config.loxone.password = "file-secret".into();

        let config = apply_env_overrides(config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.vicare.client_id, "env-client");
        assert_eq!(config.loxone.url, "http://127.0.0.1");
        assert_eq!(config.loxone.user, "reader");
        assert_eq!(config.loxone.password, "file-secret");
    }
}
