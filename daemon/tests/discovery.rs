mod tests {
    use rgb_floodlight::EffectId;
    use rgb_floodlight_daemon::config::HomeAssistantSettings;
    use rgb_floodlight_daemon::discovery::{Discovery, Topics};
    use serde_json::{Value, json};

    fn settings() -> HomeAssistantSettings {
        HomeAssistantSettings {
            node_id: "porch".to_owned(),
            node_name: "Porch".to_owned(),
            group_id: "garden".to_owned(),
            group_name: "Garden".to_owned(),
            ..HomeAssistantSettings::default()
        }
    }

    #[test]
    fn test_topics() {
        let topics = Topics::new(&settings());
        assert_eq!(topics.light.config(), "homeassistant/light/porch/rgblight/config");
        assert_eq!(topics.light.state(), "homeassistant/light/porch/rgblight/state");
        assert_eq!(topics.light.command(), "homeassistant/light/porch/rgblight/set");
        assert_eq!(topics.group.command(), "homeassistant/light/garden/rgblight/set");
        assert_eq!(topics.availability, "homeassistant/light/porch/rgblight/status");
        assert_eq!(topics.rssi.state(), "homeassistant/sensor/porch/rssi/state");
        assert_eq!(
            topics.temperature.state(),
            "homeassistant/sensor/porch/temperature/state"
        );
        assert_eq!(
            topics.over_temperature.config(),
            "homeassistant/binary_sensor/porch/over_temperature/config"
        );
    }

    #[test]
    fn test_light_document() {
        let settings = settings();
        let topics = Topics::new(&settings);
        let discovery = Discovery::new(&settings, &topics);

        let document = serde_json::to_value(&discovery.light).unwrap();
        let effects: Vec<&str> = EffectId::ALL.iter().map(|effect| effect.as_str()).collect();
        assert_eq!(
            document,
            json!({
                "name": "Porch",
                "schema": "json",
                "brightness": true,
                "rgb": true,
                "effect": true,
                "stat_t": "homeassistant/light/porch/rgblight/state",
                "cmd_t": "homeassistant/light/porch/rgblight/set",
                "bri_scl": 255,
                "fx_list": effects,
                "ret": true,
                "qos": 1
            })
        );
    }

    #[test]
    fn test_sensor_documents_with_availability() {
        let settings = HomeAssistantSettings {
            availability_enabled: true,
            ..settings()
        };
        let topics = Topics::new(&settings);
        let discovery = Discovery::new(&settings, &topics);

        let rssi = serde_json::to_value(&discovery.rssi).unwrap();
        assert_eq!(rssi["name"], "Porch RSSI");
        assert_eq!(rssi["unit_of_meas"], "dBm");
        assert_eq!(rssi["avty_t"], "homeassistant/light/porch/rgblight/status");

        let temperature = serde_json::to_value(&discovery.temperature).unwrap();
        assert_eq!(temperature["name"], "Porch Temperature");
        assert_eq!(temperature["unit_of_meas"], "°C");

        let alarm = serde_json::to_value(&discovery.over_temperature).unwrap();
        assert_eq!(alarm["name"], "Porch Over Temperature Alarm");
        assert_eq!(alarm["dev_cla"], "heat");
        assert_eq!(alarm["pl_on"], "ON");
        assert_eq!(alarm["pl_off"], "OFF");

        let light = serde_json::to_value(&discovery.light).unwrap();
        assert_eq!(light["avty_t"], "homeassistant/light/porch/rgblight/status");
    }

    #[test]
    fn test_announcements() {
        let disabled = settings();
        let topics = Topics::new(&disabled);
        let messages = Discovery::new(&disabled, &topics).announcements(&disabled, &topics);
        assert_eq!(messages.len(), 4);
        assert!(messages.iter().all(|(_, payload)| payload.is_empty()));

        let master = HomeAssistantSettings {
            discovery_enabled: true,
            group_enabled: true,
            group_master: true,
            ..settings()
        };
        let messages = Discovery::new(&master, &topics).announcements(&master, &topics);
        assert_eq!(messages.len(), 5);
        let (topic, payload) = &messages[4];
        assert_eq!(topic, "homeassistant/light/garden/rgblight/config");
        let group: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(group["name"], "Garden");
        assert_eq!(group["cmd_t"], "homeassistant/light/garden/rgblight/set");

        let member = HomeAssistantSettings {
            group_master: false,
            ..master
        };
        let messages = Discovery::new(&member, &topics).announcements(&member, &topics);
        assert_eq!(messages.len(), 4);
        assert!(messages.iter().all(|(_, payload)| !payload.is_empty()));
    }
}
