//! Daemon lifecycle: startup, render loop and orderly shutdown

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use linux_embedded_hal::{Delay, I2cdev};
use log::{info, warn};
use rgb_floodlight::{FrameScheduler, Instant, LightState, Pca9685, Renderer, StateChannel};

use crate::config::Settings;
use crate::discovery::{PAYLOAD_NOT_AVAILABLE, Topics};
use crate::mqtt::{self, Controller, Publisher};
use crate::sensors::{Ds18b20, SensorTask};
use crate::shutdown::ShutdownFlag;
use crate::state_store::{DebouncedWriter, StateStore};

/// Desired states in flight between the MQTT thread and the render loop
pub const STATE_CHANNEL_SIZE: usize = 4;

static STATES: StateChannel<STATE_CHANNEL_SIZE> = StateChannel::new();

pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let shutdown = ShutdownFlag::new();
    shutdown
        .register_signals()
        .context("failed to install signal handlers")?;

    // Nothing else is started until the output is known to work
    let led = &settings.led;
    let i2c = I2cdev::new(&led.i2c_bus)
        .with_context(|| format!("failed to open I2C bus '{}'", led.i2c_bus.display()))?;
    let mut pwm = Pca9685::new(i2c, Delay, led.address)
        .map_err(|err| anyhow!("failed to reset the PCA9685: {err:?}"))?;
    pwm.set_frequency(led.frequency)
        .map_err(|err| anyhow!("failed to set the PWM frequency: {err:?}"))?;

    let store = StateStore::new(&settings.floodlight.state_file);
    let writer = DebouncedWriter::spawn(store.clone(), settings.floodlight.save_delay());
    let initial = match store.load() {
        Ok(state) => {
            info!("Loaded state file '{}'.", store.path().display());
            state
        }
        Err(err) => {
            warn!(
                "Failed to load state file '{}': {err}",
                store.path().display()
            );
            let state = LightState::default();
            writer.queue(state);
            state
        }
    };

    let topics = Topics::new(&settings.home_assistant);
    let (client, mut event_loop) = mqtt::connect(settings, &topics);
    let connected = Arc::new(AtomicBool::new(false));
    let mut controller = Controller::new(
        client.clone(),
        &settings.home_assistant,
        initial,
        STATES.sender(),
        writer.handle(),
        Arc::clone(&connected),
    );
    if !event_loop.wait_for_connection(&mut controller, &shutdown) {
        writer.shutdown();
        return Ok(());
    }
    let mqtt_thread = {
        let shutdown = shutdown.clone();
        thread::Builder::new()
            .name("mqtt".to_owned())
            .spawn(move || event_loop.run(controller, &shutdown))
            .context("failed to start the MQTT thread")?
    };

    let overheated = Arc::new(AtomicBool::new(false));
    let sensor = match Ds18b20::discover(&settings.floodlight.w1_devices) {
        Ok(sensor) => Some(sensor),
        Err(err) => {
            warn!("HAT 1-Wire temperature sensor not found: {err}");
            None
        }
    };
    let sensor_task = SensorTask::new(
        &settings.floodlight,
        sensor,
        client.clone(),
        topics.clone(),
        Arc::clone(&connected),
        Arc::clone(&overheated),
    );
    let sensor_thread = {
        let shutdown = shutdown.clone();
        thread::Builder::new()
            .name("sensors".to_owned())
            .spawn(move || sensor_task.run(&shutdown))
            .context("failed to start the sensor thread")?
    };

    let renderer = Renderer::new(STATES.receiver(), &settings.renderer_config(), initial);
    let mut scheduler = FrameScheduler::new(renderer, pwm, Instant::now());
    let mut cutoff = false;
    let mut failing = false;
    while !shutdown.is_set() {
        let hot = overheated.load(Ordering::Relaxed);
        if hot != cutoff {
            cutoff = hot;
            if hot {
                warn!("Over temperature, switching the LED off");
            } else {
                info!("Temperature back to normal, resuming output");
            }
            scheduler.renderer_mut().set_safety_cutoff(hot);
        }

        let sleep = match scheduler.tick(Instant::now()) {
            Ok(frame) => {
                failing = false;
                frame.sleep_duration
            }
            Err(err) => {
                if !failing {
                    warn!("Failed to update the LED: {err:?}");
                }
                failing = true;
                scheduler.frame_duration()
            }
        };
        thread::sleep(Duration::from_micros(sleep.as_micros()));
    }

    info!("Shutting down");
    if let Err(err) = scheduler.blackout() {
        warn!("Failed to switch the LED off: {err:?}");
    }
    if settings.home_assistant.availability_enabled {
        let offline =
            Publisher::publish(&client, &topics.availability, PAYLOAD_NOT_AVAILABLE, true);
        if let Err(err) = offline {
            warn!("Failed to publish availability: {err}");
        }
    }
    if let Err(err) = client.disconnect() {
        warn!("Failed to disconnect from the broker: {err}");
    }
    for (name, handle) in [("MQTT", mqtt_thread), ("sensor", sensor_thread)] {
        if handle.join().is_err() {
            warn!("The {name} thread panicked");
        }
    }
    writer.shutdown();
    Ok(())
}
