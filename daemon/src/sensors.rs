//! Board temperature and WiFi signal monitoring

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, warn};

use crate::command::{PAYLOAD_OFF, PAYLOAD_ON};
use crate::config::FloodlightSettings;
use crate::discovery::Topics;
use crate::error::SensorError;
use crate::mqtt::Publisher;
use crate::shutdown::ShutdownFlag;

/// Drop below the threshold needed to clear the alarm
pub const ALARM_HYSTERESIS: f32 = 5.0;

/// One-wire family code of the DS18B20
const DS18B20_FAMILY: &str = "28-";

pub trait TemperatureSensor {
    /// Current temperature in °C
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

/// DS18B20 behind the Linux `w1_therm` driver
#[derive(Debug, Clone)]
pub struct Ds18b20 {
    path: PathBuf,
}

impl Ds18b20 {
    /// Pick the DS18B20 listed under a sysfs devices directory.
    ///
    /// With several sensors attached the last one in name order is used.
    pub fn discover(devices: &Path) -> Result<Self, SensorError> {
        let mut names: Vec<String> = fs::read_dir(devices)?
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(DS18B20_FAMILY))
            .collect();
        names.sort();

        let name = names
            .pop()
            .ok_or_else(|| SensorError::NotFound(devices.to_path_buf()))?;
        Ok(Self {
            path: devices.join(name).join("w1_slave"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemperatureSensor for Ds18b20 {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        parse_w1_slave(&fs::read_to_string(&self.path)?)
    }
}

/// Parse the two line `w1_slave` report.
///
/// ```text
/// 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
/// 72 01 4b 46 7f ff 0e 10 57 t=23125
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn parse_w1_slave(contents: &str) -> Result<f32, SensorError> {
    let mut lines = contents.lines();
    let status = lines.next().ok_or(SensorError::Parse)?;
    if !status.trim_end().ends_with("YES") {
        return Err(SensorError::Crc);
    }

    let reading = lines.next().ok_or(SensorError::Parse)?;
    let (_, millis) = reading.rsplit_once("t=").ok_or(SensorError::Parse)?;
    let millis: i32 = millis.trim().parse().map_err(|_| SensorError::Parse)?;
    Ok(millis as f32 / 1000.0)
}

/// Signal level of `interface` in dBm, as reported by `iwconfig`
pub fn read_rssi(interface: &str) -> Option<i32> {
    let output = Command::new("iwconfig").arg(interface).output();
    match output {
        Ok(output) => parse_rssi(&String::from_utf8_lossy(&output.stdout)),
        Err(err) => {
            debug!("Failed to run iwconfig: {err}");
            None
        }
    }
}

/// Pick `Signal level=-52 dBm` out of `iwconfig` output
pub fn parse_rssi(output: &str) -> Option<i32> {
    let (_, level) = output.split_once("Signal level=")?;
    level.split_whitespace().next()?.parse().ok()
}

/// What the monitor asks to be published after a reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// Temperature maximum of the interval, and the current RSSI
    Measurements { max_temperature: Option<f32> },
    /// Over-temperature alarm raised or cleared
    Alarm(bool),
}

/// Temperature bookkeeping between publications
#[derive(Debug, Clone)]
pub struct TemperatureMonitor {
    measurement_secs: u64,
    publish_secs: u64,
    threshold: f32,
    elapsed_secs: u64,
    max_temperature: Option<f32>,
    alarm: bool,
    overheated: bool,
}

impl TemperatureMonitor {
    pub fn new(measurement_secs: u64, publish_secs: u64, threshold: f32) -> Self {
        Self {
            measurement_secs,
            publish_secs,
            threshold,
            elapsed_secs: 0,
            max_temperature: None,
            // Raised so the first reading publishes the alarm state
            alarm: true,
            overheated: false,
        }
    }

    pub fn from_settings(settings: &FloodlightSettings) -> Self {
        Self::new(
            settings.temp_measurement_time.max(1),
            settings.temp_publish_rate,
            settings.temp_alarm,
        )
    }

    /// Account one measurement interval.
    ///
    /// Publications and alarm transitions are held back while disconnected,
    /// the interval keeps accumulating until the broker is back.
    pub fn record(&mut self, reading: Option<f32>, connected: bool) -> Vec<SensorEvent> {
        let mut events = Vec::new();
        self.elapsed_secs = self.elapsed_secs.saturating_add(self.measurement_secs);

        if let Some(temperature) = reading {
            self.max_temperature = Some(match self.max_temperature {
                Some(max) => max.max(temperature),
                None => temperature,
            });

            if temperature >= self.threshold {
                self.overheated = true;
            } else if temperature < self.threshold - ALARM_HYSTERESIS {
                self.overheated = false;
            }
        }

        if self.elapsed_secs >= self.publish_secs && connected {
            events.push(self.flush());
        }

        if let Some(temperature) = reading.filter(|_| connected) {
            if self.alarm && temperature < self.threshold - ALARM_HYSTERESIS {
                self.alarm = false;
                events.push(SensorEvent::Alarm(false));
            } else if !self.alarm && temperature >= self.threshold {
                self.alarm = true;
                events.push(SensorEvent::Alarm(true));
            }
        }

        events
    }

    /// Close the current interval, returning its maximum
    pub fn flush(&mut self) -> SensorEvent {
        self.elapsed_secs = 0;
        SensorEvent::Measurements {
            max_temperature: self.max_temperature.take(),
        }
    }

    /// Last reading was at or above the threshold and has not cooled down yet
    pub fn is_overheated(&self) -> bool {
        self.overheated
    }

    pub fn alarm(&self) -> bool {
        self.alarm
    }
}

/// Periodic measurement loop, publishing through `P`
pub struct SensorTask<S, P> {
    monitor: TemperatureMonitor,
    sensor: Option<S>,
    wifi_interface: String,
    interval: Duration,
    publisher: P,
    topics: Topics,
    connected: Arc<AtomicBool>,
    overheated: Arc<AtomicBool>,
}

impl<S: TemperatureSensor, P: Publisher> SensorTask<S, P> {
    pub fn new(
        settings: &FloodlightSettings,
        sensor: Option<S>,
        publisher: P,
        topics: Topics,
        connected: Arc<AtomicBool>,
        overheated: Arc<AtomicBool>,
    ) -> Self {
        Self {
            monitor: TemperatureMonitor::from_settings(settings),
            sensor,
            wifi_interface: settings.wifi_interface.clone(),
            interval: settings.measurement_interval(),
            publisher,
            topics,
            connected,
            overheated,
        }
    }

    /// Measure and publish once right away, then every interval until
    /// shutdown.
    pub fn run(mut self, shutdown: &ShutdownFlag) {
        self.measure();
        let event = self.monitor.flush();
        self.publish(event);

        while shutdown.sleep(self.interval) {
            self.measure();
        }
    }

    /// Take one reading and publish whatever it triggers
    pub fn measure(&mut self) {
        let reading = self.sensor.as_mut().and_then(|sensor| match sensor.read_celsius() {
            Ok(temperature) => Some(temperature),
            Err(err) => {
                warn!("Failed to read temperature: {err}");
                None
            }
        });

        let connected = self.connected.load(Ordering::Relaxed);
        let events = self.monitor.record(reading, connected);
        self.overheated
            .store(self.monitor.is_overheated(), Ordering::Relaxed);
        for event in events {
            self.publish(event);
        }
    }

    pub fn monitor(&self) -> &TemperatureMonitor {
        &self.monitor
    }

    fn publish(&self, event: SensorEvent) {
        match event {
            SensorEvent::Measurements { max_temperature } => {
                if let Some(temperature) = max_temperature {
                    self.send(&self.topics.temperature.state(), &format!("{temperature:.1}"));
                }
                if let Some(rssi) = read_rssi(&self.wifi_interface) {
                    self.send(&self.topics.rssi.state(), &rssi.to_string());
                }
            }
            SensorEvent::Alarm(raised) => {
                let payload = if raised { PAYLOAD_ON } else { PAYLOAD_OFF };
                self.send(&self.topics.over_temperature.state(), payload);
            }
        }
    }

    fn send(&self, topic: &str, payload: &str) {
        if let Err(err) = self.publisher.publish(topic, payload, true) {
            warn!("Failed to publish to '{topic}': {err}");
        }
    }
}
