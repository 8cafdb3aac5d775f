//! Home Assistant MQTT discovery topics and documents

use rgb_floodlight::EffectId;
use serde::Serialize;

use crate::command::{PAYLOAD_OFF, PAYLOAD_ON};
use crate::config::HomeAssistantSettings;

/// QoS level used for every publication, at least once
pub const QOS: u8 = 1;

pub const PAYLOAD_AVAILABLE: &str = "online";
pub const PAYLOAD_NOT_AVAILABLE: &str = "offline";

/// Base topic of one discovered entity, `<prefix>/<component>/<id>/<object>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTopic {
    base: String,
}

impl EntityTopic {
    fn new(prefix: &str, component: &str, id: &str, object: &str) -> Self {
        Self {
            base: [prefix, component, id, object].join("/"),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn config(&self) -> String {
        format!("{}/config", self.base)
    }

    pub fn state(&self) -> String {
        format!("{}/state", self.base)
    }

    pub fn command(&self) -> String {
        format!("{}/set", self.base)
    }
}

/// Every topic the node publishes or subscribes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub light: EntityTopic,
    pub group: EntityTopic,
    pub rssi: EntityTopic,
    pub temperature: EntityTopic,
    pub over_temperature: EntityTopic,
    pub availability: String,
}

impl Topics {
    pub fn new(settings: &HomeAssistantSettings) -> Self {
        let prefix = settings.discovery_prefix.as_str();
        let node = settings.node_id.as_str();
        let light = EntityTopic::new(prefix, "light", node, "rgblight");
        let availability = format!("{}/status", light.base());
        Self {
            group: EntityTopic::new(prefix, "light", &settings.group_id, "rgblight"),
            rssi: EntityTopic::new(prefix, "sensor", node, "rssi"),
            temperature: EntityTopic::new(prefix, "sensor", node, "temperature"),
            over_temperature: EntityTopic::new(prefix, "binary_sensor", node, "over_temperature"),
            light,
            availability,
        }
    }
}

/// JSON schema light entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightConfig {
    pub name: String,
    pub schema: &'static str,
    pub brightness: bool,
    pub rgb: bool,
    pub effect: bool,
    pub stat_t: String,
    pub cmd_t: String,
    pub bri_scl: u8,
    pub fx_list: Vec<&'static str>,
    pub ret: bool,
    pub qos: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avty_t: Option<String>,
}

impl LightConfig {
    fn new(name: &str, topic: &EntityTopic, availability: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            schema: "json",
            brightness: true,
            rgb: true,
            effect: true,
            stat_t: topic.state(),
            cmd_t: topic.command(),
            bri_scl: u8::MAX,
            fx_list: EffectId::ALL.iter().map(|effect| effect.as_str()).collect(),
            ret: true,
            qos: QOS,
            avty_t: availability.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorConfig {
    pub name: String,
    pub stat_t: String,
    pub unit_of_meas: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avty_t: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinarySensorConfig {
    pub name: String,
    pub stat_t: String,
    pub dev_cla: &'static str,
    pub pl_on: &'static str,
    pub pl_off: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avty_t: Option<String>,
}

/// Discovery documents of the node
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub light: LightConfig,
    pub group: LightConfig,
    pub rssi: SensorConfig,
    pub temperature: SensorConfig,
    pub over_temperature: BinarySensorConfig,
}

impl Discovery {
    pub fn new(settings: &HomeAssistantSettings, topics: &Topics) -> Self {
        let availability = settings
            .availability_enabled
            .then_some(topics.availability.as_str());
        let node_name = settings.node_name.as_str();
        let avty_t = availability.map(str::to_owned);

        Self {
            light: LightConfig::new(node_name, &topics.light, availability),
            group: LightConfig::new(&settings.group_name, &topics.group, availability),
            rssi: SensorConfig {
                name: format!("{node_name} RSSI"),
                stat_t: topics.rssi.state(),
                unit_of_meas: "dBm",
                avty_t: avty_t.clone(),
            },
            temperature: SensorConfig {
                name: format!("{node_name} Temperature"),
                stat_t: topics.temperature.state(),
                unit_of_meas: "°C",
                avty_t: avty_t.clone(),
            },
            over_temperature: BinarySensorConfig {
                name: format!("{node_name} Over Temperature Alarm"),
                stat_t: topics.over_temperature.state(),
                dev_cla: "heat",
                pl_on: PAYLOAD_ON,
                pl_off: PAYLOAD_OFF,
                avty_t,
            },
        }
    }

    /// Retained `(topic, payload)` pairs announced on every connection.
    ///
    /// With discovery disabled the node entities are cleared with empty
    /// payloads. The group light is only announced by the group master.
    pub fn announcements(
        &self,
        settings: &HomeAssistantSettings,
        topics: &Topics,
    ) -> Vec<(String, String)> {
        let node_topics = [
            topics.light.config(),
            topics.rssi.config(),
            topics.temperature.config(),
            topics.over_temperature.config(),
        ];

        let mut messages: Vec<(String, String)> = if settings.discovery_enabled {
            let payloads = [
                to_json(&self.light),
                to_json(&self.rssi),
                to_json(&self.temperature),
                to_json(&self.over_temperature),
            ];
            node_topics.into_iter().zip(payloads).collect()
        } else {
            node_topics
                .into_iter()
                .map(|topic| (topic, String::new()))
                .collect()
        };

        if settings.discovery_enabled && settings.group_enabled && settings.group_master {
            messages.push((topics.group.config(), to_json(&self.group)));
        }
        messages
    }
}

fn to_json<T: Serialize>(document: &T) -> String {
    // Documents are plain structs of strings, numbers and lists
    serde_json::to_string(document).unwrap_or_default()
}
