mod tests {
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use rgb_floodlight_daemon::Result;
    use rgb_floodlight_daemon::config::{FloodlightSettings, HomeAssistantSettings};
    use rgb_floodlight_daemon::discovery::Topics;
    use rgb_floodlight_daemon::error::SensorError;
    use rgb_floodlight_daemon::mqtt::Publisher;
    use rgb_floodlight_daemon::sensors::{
        Ds18b20, SensorEvent, SensorTask, TemperatureMonitor, TemperatureSensor, parse_rssi,
        parse_w1_slave,
    };

    const W1_SLAVE: &str = "72 01 4b 46 7f ff 0e 10 57 : crc=57 YES\n\
                            72 01 4b 46 7f ff 0e 10 57 t=23125\n";

    #[test]
    fn test_parse_w1_slave() {
        let celsius = parse_w1_slave(W1_SLAVE).unwrap();
        assert!((celsius - 23.125).abs() < 1e-4);

        let negative = "ff ff : crc=aa YES\nff ff t=-1250\n";
        assert!((parse_w1_slave(negative).unwrap() + 1.25).abs() < 1e-4);

        let bad_crc = "72 01 : crc=00 NO\n72 01 t=23125\n";
        assert!(matches!(parse_w1_slave(bad_crc), Err(SensorError::Crc)));
        assert!(matches!(parse_w1_slave(""), Err(SensorError::Parse)));
        assert!(matches!(
            parse_w1_slave("72 : crc=57 YES\n72 01\n"),
            Err(SensorError::Parse)
        ));
    }

    #[test]
    fn test_parse_rssi() {
        let output = "wlan0     IEEE 802.11  ESSID:\"home\"\n\
                      Link Quality=58/70  Signal level=-52 dBm\n\
                      Rx invalid nwid:0  Rx invalid crypt:0\n";
        assert_eq!(parse_rssi(output), Some(-52));
        assert_eq!(parse_rssi("wlan0     no wireless extensions."), None);
        assert_eq!(parse_rssi("Signal level=60/100"), None);
    }

    #[test]
    fn test_discover_sensor() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Ds18b20::discover(dir.path()),
            Err(SensorError::NotFound(_))
        ));

        fs::create_dir(dir.path().join("w1_bus_master1")).unwrap();
        let device = dir.path().join("28-000005e2fdc3");
        fs::create_dir(&device).unwrap();
        fs::write(device.join("w1_slave"), W1_SLAVE).unwrap();

        let mut sensor = Ds18b20::discover(dir.path()).unwrap();
        assert_eq!(sensor.path(), device.join("w1_slave"));
        assert!((sensor.read_celsius().unwrap() - 23.125).abs() < 1e-4);
    }

    #[test]
    fn test_monitor_publishes_maximum_per_interval() {
        let mut monitor = TemperatureMonitor::new(10, 30, 85.0);
        // First reading clears the initially raised alarm
        assert_eq!(monitor.record(Some(40.0), true), vec![SensorEvent::Alarm(false)]);
        assert!(monitor.record(Some(45.0), true).is_empty());
        assert_eq!(
            monitor.record(Some(42.0), true),
            vec![SensorEvent::Measurements {
                max_temperature: Some(45.0)
            }]
        );

        // A new interval starts from scratch
        assert!(monitor.record(Some(30.0), true).is_empty());
        assert!(monitor.record(None, true).is_empty());
        assert_eq!(
            monitor.record(None, true),
            vec![SensorEvent::Measurements {
                max_temperature: Some(30.0)
            }]
        );
    }

    #[test]
    fn test_monitor_waits_for_connection() {
        let mut monitor = TemperatureMonitor::new(10, 20, 85.0);
        assert!(monitor.record(Some(40.0), false).is_empty());
        assert!(monitor.record(Some(41.0), false).is_empty());
        assert!(monitor.alarm());

        let events = monitor.record(Some(39.0), true);
        assert_eq!(
            events,
            vec![
                SensorEvent::Measurements {
                    max_temperature: Some(41.0)
                },
                SensorEvent::Alarm(false),
            ]
        );
    }

    #[test]
    fn test_alarm_hysteresis() {
        let mut monitor = TemperatureMonitor::new(10, 1000, 85.0);
        assert_eq!(monitor.record(Some(50.0), true), vec![SensorEvent::Alarm(false)]);
        assert!(!monitor.is_overheated());

        assert_eq!(monitor.record(Some(85.0), true), vec![SensorEvent::Alarm(true)]);
        assert!(monitor.is_overheated());

        // Inside the hysteresis band nothing changes
        assert!(monitor.record(Some(82.0), true).is_empty());
        assert!(monitor.is_overheated());
        assert!(monitor.alarm());

        assert_eq!(monitor.record(Some(79.9), true), vec![SensorEvent::Alarm(false)]);
        assert!(!monitor.is_overheated());
    }

    #[test]
    fn test_overheat_tracked_while_disconnected() {
        let mut monitor = TemperatureMonitor::new(10, 1000, 85.0);
        assert!(monitor.record(Some(90.0), false).is_empty());
        assert!(monitor.is_overheated());
        assert!(monitor.record(Some(70.0), false).is_empty());
        assert!(!monitor.is_overheated());
    }

    struct FakeSensor {
        readings: VecDeque<Result<f32, SensorError>>,
    }

    impl TemperatureSensor for FakeSensor {
        fn read_celsius(&mut self) -> Result<f32, SensorError> {
            self.readings.pop_front().unwrap_or(Err(SensorError::Parse))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPublisher {
        published: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl Publisher for RecordingPublisher {
        fn publish(&self, topic: &str, payload: &str, _retain: bool) -> Result<()> {
            self.published
                .lock()
                .unwrap()
                .push((topic.to_owned(), payload.to_owned()));
            Ok(())
        }

        fn subscribe(&self, _topic: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_task_publishes_and_cuts_off() {
        let settings = FloodlightSettings {
            temp_measurement_time: 10,
            temp_publish_rate: 20,
            wifi_interface: "rgbtest0".to_owned(),
            ..FloodlightSettings::default()
        };
        let topics = Topics::new(&HomeAssistantSettings::default());
        let publisher = RecordingPublisher::default();
        let connected = Arc::new(AtomicBool::new(true));
        let overheated = Arc::new(AtomicBool::new(false));
        let sensor = FakeSensor {
            readings: VecDeque::from([Ok(86.0), Err(SensorError::Crc), Ok(70.0)]),
        };
        let mut task = SensorTask::new(
            &settings,
            Some(sensor),
            publisher.clone(),
            topics.clone(),
            Arc::clone(&connected),
            Arc::clone(&overheated),
        );

        task.measure();
        assert!(overheated.load(Ordering::Relaxed));
        task.measure();
        assert!(overheated.load(Ordering::Relaxed));
        task.measure();
        assert!(!overheated.load(Ordering::Relaxed));

        let published = publisher.published.lock().unwrap().clone();
        let temperature = topics.temperature.state();
        let alarm = topics.over_temperature.state();
        assert!(published.contains(&(temperature, "86.0".to_owned())));
        assert!(published.contains(&(alarm, "OFF".to_owned())));
        assert!(!task.monitor().alarm());
    }
}
