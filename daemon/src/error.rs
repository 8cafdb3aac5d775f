use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config file '{0}' is missing")]
    MissingConfig(PathBuf),
    #[error("failed to load config: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("state file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("'{0}' is not a valid effect")]
    UnknownEffect(String),
    #[error("mqtt request failed: {0}")]
    Mqtt(#[from] rumqttc::ClientError),
}

/// Reasons a light command is rejected
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to decode command: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("commanded effect '{0}' is not a valid effect")]
    UnknownEffect(String),
}

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("no DS18B20 found under '{0}'")]
    NotFound(PathBuf),
    #[error("sensor read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("sensor reported a CRC mismatch")]
    Crc,
    #[error("unexpected sensor output")]
    Parse,
}
