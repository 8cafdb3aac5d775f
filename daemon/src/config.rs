//! INI configuration of the daemon
//!
//! Section and key names follow the `rgbfloodlight.conf` layout and are
//! matched case-insensitively. Every key is optional and falls back to the
//! default listed on its field.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, File, FileFormat, Map, Value, ValueKind};
use rgb_floodlight::filter::MAX_DUTY;
use rgb_floodlight::pca9685::DEFAULT_ADDRESS;
use rgb_floodlight::{ColorCorrection, FilterProcessorConfig, RendererConfig};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "rgbfloodlight.conf";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mqtt: MqttSettings,
    #[serde(rename = "home assistant")]
    pub home_assistant: HomeAssistantSettings,
    #[serde(rename = "rgb floodlight")]
    pub floodlight: FloodlightSettings,
    pub led: LedSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MqttSettings {
    /// `127.0.0.1`
    pub broker: String,
    /// `1883`
    pub port: u16,
    /// Seconds, `60`
    #[serde(rename = "keepalive")]
    pub keep_alive: u16,
    /// Authentication is skipped while empty
    #[serde(rename = "username")]
    pub user_name: String,
    pub password: String,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            broker: "127.0.0.1".to_owned(),
            port: 1883,
            keep_alive: 60,
            user_name: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HomeAssistantSettings {
    pub discovery_enabled: bool,
    pub discovery_prefix: String,
    pub node_id: String,
    pub node_name: String,
    pub group_enabled: bool,
    /// Only the group master announces the group light
    pub group_master: bool,
    pub group_id: String,
    pub group_name: String,
    pub availability_enabled: bool,
}

impl Default for HomeAssistantSettings {
    fn default() -> Self {
        Self {
            discovery_enabled: false,
            discovery_prefix: "homeassistant".to_owned(),
            node_id: "default_node_id".to_owned(),
            node_name: "Default Node Name".to_owned(),
            group_enabled: false,
            group_master: false,
            group_id: "default_group_id".to_owned(),
            group_name: "Default Group Name".to_owned(),
            availability_enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloodlightSettings {
    /// Seconds between temperature readings
    pub temp_measurement_time: u64,
    /// Seconds between temperature publications
    pub temp_publish_rate: u64,
    /// Over-temperature threshold in °C
    pub temp_alarm: f32,
    /// Frames per second
    pub update_rate: u32,
    pub state_file: PathBuf,
    /// Seconds of quiet before the state file is written
    pub save_delay: u64,
    pub wifi_interface: String,
    /// One-wire sysfs device directory
    pub w1_devices: PathBuf,
}

impl Default for FloodlightSettings {
    fn default() -> Self {
        Self {
            temp_measurement_time: 10,
            temp_publish_rate: 300,
            temp_alarm: 85.0,
            update_rate: 30,
            state_file: PathBuf::from("rgbfloodlightstate.json"),
            save_delay: 60,
            wifi_interface: "wlan0".to_owned(),
            w1_devices: PathBuf::from("/sys/bus/w1/devices"),
        }
    }
}

impl FloodlightSettings {
    pub fn measurement_interval(&self) -> Duration {
        Duration::from_secs(self.temp_measurement_time.max(1))
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_secs(self.save_delay)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedSettings {
    pub i2c_bus: PathBuf,
    /// 7-bit bus address, decimal or `0x` hexadecimal
    #[serde(deserialize_with = "deserialize_address")]
    pub address: u8,
    /// PWM frequency in Hz
    pub frequency: u16,
    pub gamma: f32,
    pub scale_r: f32,
    pub scale_g: f32,
    pub scale_b: f32,
}

impl Default for LedSettings {
    fn default() -> Self {
        let correction = ColorCorrection::default();
        Self {
            i2c_bus: PathBuf::from("/dev/i2c-1"),
            address: DEFAULT_ADDRESS,
            frequency: 200,
            gamma: 1.8,
            scale_r: correction.r,
            scale_g: correction.g,
            scale_b: correction.b,
        }
    }
}

impl Settings {
    /// Read the INI file at `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingConfig(path.to_path_buf()));
        }

        let raw: Value = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .build()?
            .try_deserialize()?;
        let settings = fold_keys(raw).try_deserialize()?;
        Ok(settings)
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            tick_rate: self.floodlight.update_rate.max(1),
            filters: FilterProcessorConfig {
                gamma: self.led.gamma,
                max_duty: MAX_DUTY,
                color_correction: ColorCorrection::new(
                    self.led.scale_r,
                    self.led.scale_g,
                    self.led.scale_b,
                ),
            },
        }
    }
}

/// Lowercase every section and key name
fn fold_keys(value: Value) -> Value {
    let origin = value.origin().map(str::to_owned);
    let kind = match value.kind {
        ValueKind::Table(table) => ValueKind::Table(
            table
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), fold_keys(value)))
                .collect::<Map<_, _>>(),
        ),
        kind => kind,
    };
    Value::new(origin.as_ref(), kind)
}

fn deserialize_address<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let text = String::deserialize(deserializer)?;
    let text = text.trim();
    let address = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse(),
    };
    address.map_err(|_| {
        de::Error::invalid_value(Unexpected::Str(text), &"a bus address like 64 or 0x40")
    })
}
