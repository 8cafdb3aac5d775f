//! MQTT session: Home Assistant announcements, command intake and state
//! publication.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, info, warn};
use rgb_floodlight::{LightState, StateSender};
use rumqttc::{
    Client, ConnectReturnCode, Connection, ConnectionError, Event, LastWill, MqttOptions,
    Outgoing, Packet, QoS,
};

use crate::command::{StatePayload, parse_command};
use crate::config::{HomeAssistantSettings, Settings};
use crate::discovery::{Discovery, PAYLOAD_AVAILABLE, PAYLOAD_NOT_AVAILABLE, Topics};
use crate::error::{CommandError, Result};
use crate::shutdown::ShutdownFlag;
use crate::state_store::SaveQueue;

/// Delay between connection attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Requests buffered between the client handles and the event loop
const REQUEST_CAPACITY: usize = 64;

/// Smallest keep alive the client accepts
const MIN_KEEP_ALIVE_SECS: u16 = 5;

/// Outgoing side of the broker connection
///
/// Publications are retained or not per call and always use QoS 1.
pub trait Publisher {
    fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()>;

    fn subscribe(&self, topic: &str) -> Result<()>;
}

impl Publisher for Client {
    fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
        // Never block, the event loop thread publishes too
        self.try_publish(topic, QoS::AtLeastOnce, retain, payload.as_bytes().to_vec())?;
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<()> {
        self.try_subscribe(topic, QoS::AtLeastOnce)?;
        Ok(())
    }
}

/// Reacts to broker events on behalf of the light
pub struct Controller<'a, P, const STATE_CHANNEL_SIZE: usize> {
    publisher: P,
    settings: HomeAssistantSettings,
    topics: Topics,
    discovery: Discovery,
    desired: LightState,
    states: StateSender<'a, STATE_CHANNEL_SIZE>,
    saves: SaveQueue,
    connected: Arc<AtomicBool>,
}

impl<'a, P: Publisher, const STATE_CHANNEL_SIZE: usize> Controller<'a, P, STATE_CHANNEL_SIZE> {
    pub fn new(
        publisher: P,
        settings: &HomeAssistantSettings,
        initial: LightState,
        states: StateSender<'a, STATE_CHANNEL_SIZE>,
        saves: SaveQueue,
        connected: Arc<AtomicBool>,
    ) -> Self {
        let topics = Topics::new(settings);
        Self {
            discovery: Discovery::new(settings, &topics),
            topics,
            publisher,
            settings: settings.clone(),
            desired: initial,
            states,
            saves,
            connected,
        }
    }

    pub fn desired(&self) -> &LightState {
        &self.desired
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Announce the node and resubscribe, runs after every CONNACK
    pub fn on_connect(&mut self) {
        self.connected.store(true, Ordering::Relaxed);

        for (topic, payload) in self.discovery.announcements(&self.settings, &self.topics) {
            self.publish(&topic, &payload, true);
        }

        // Clear a stale retained status when availability is off
        let availability = if self.settings.availability_enabled {
            PAYLOAD_AVAILABLE
        } else {
            ""
        };
        self.publish(&self.topics.availability, availability, true);

        self.subscribe(&self.topics.light.command());
        if self.settings.group_enabled {
            self.subscribe(&self.topics.group.command());
        }

        self.publish_state(false);
    }

    pub fn on_disconnect(&mut self) {
        if self.connected.swap(false, Ordering::Relaxed) {
            warn!("Lost connection to the MQTT broker");
        }
    }

    /// Handle a publication on one of the command topics
    pub fn on_message(&mut self, topic: &str, payload: &[u8]) {
        let from_group = self.settings.group_enabled && topic == self.topics.group.command();
        if !from_group && topic != self.topics.light.command() {
            warn!(
                "Received unknown command topic '{topic}', with payload '{}'.",
                String::from_utf8_lossy(payload)
            );
            return;
        }

        match parse_command(payload) {
            Ok(intent) => {
                let next = self.desired.apply(&intent);
                if next != self.desired {
                    self.desired = next;
                    self.states.force_send(next);
                    self.saves.queue(next);
                }
            }
            Err(err @ CommandError::UnknownEffect(_)) => warn!("{err}"),
            Err(err) => {
                warn!("{err}: '{}'", String::from_utf8_lossy(payload));
                return;
            }
        }

        self.publish_state(from_group);
    }

    /// Publish the desired state, mirrored to the group when this node leads it
    pub fn publish_state(&self, group: bool) {
        let payload = StatePayload::from(&self.desired).to_json();
        self.publish(&self.topics.light.state(), &payload, true);
        if group && self.settings.group_enabled && self.settings.group_master {
            self.publish(&self.topics.group.state(), &payload, true);
        }
    }

    fn publish(&self, topic: &str, payload: &str, retain: bool) {
        if let Err(err) = self.publisher.publish(topic, payload, retain) {
            warn!("Failed to publish to '{topic}': {err}");
        }
    }

    fn subscribe(&self, topic: &str) {
        match self.publisher.subscribe(topic) {
            Ok(()) => debug!("Subscribed to '{topic}'"),
            Err(err) => warn!("Failed to subscribe to '{topic}': {err}"),
        }
    }
}

/// Build the client and its event loop from the settings
pub fn connect(settings: &Settings, topics: &Topics) -> (Client, EventLoop) {
    let mqtt = &settings.mqtt;
    let client_id = format!("rgb-floodlight-{}", settings.home_assistant.node_id);
    let mut options = MqttOptions::new(client_id, &mqtt.broker, mqtt.port);
    options.set_keep_alive(Duration::from_secs(u64::from(
        mqtt.keep_alive.max(MIN_KEEP_ALIVE_SECS),
    )));
    if !mqtt.user_name.is_empty() {
        info!("MQTT authentication will be used");
        options.set_credentials(&mqtt.user_name, &mqtt.password);
    }
    if settings.home_assistant.availability_enabled {
        options.set_last_will(LastWill::new(
            &topics.availability,
            PAYLOAD_NOT_AVAILABLE,
            QoS::AtLeastOnce,
            false,
        ));
    }

    let (client, connection) = Client::new(options, REQUEST_CAPACITY);
    let event_loop = EventLoop {
        connection,
        url: format!("mqtt://{}:{}", mqtt.broker, mqtt.port),
    };
    (client, event_loop)
}

/// Drives the connection and feeds its events to a [`Controller`]
pub struct EventLoop {
    connection: Connection,
    url: String,
}

impl EventLoop {
    /// Block until the broker accepts the connection, retrying every
    /// [`RETRY_DELAY`].
    ///
    /// Returns `false` if shutdown was requested first.
    pub fn wait_for_connection<P: Publisher, const N: usize>(
        &mut self,
        controller: &mut Controller<'_, P, N>,
        shutdown: &ShutdownFlag,
    ) -> bool {
        for notification in self.connection.iter() {
            if shutdown.is_set() {
                return false;
            }
            match notification {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker: {}", self.url);
                    controller.on_connect();
                    return true;
                }
                Ok(_) => {}
                Err(err) => {
                    log_connection_error(&self.url, &err);
                    if !shutdown.sleep(RETRY_DELAY) {
                        return false;
                    }
                }
            }
        }
        false
    }

    /// Process events until the client disconnects or shutdown is requested
    pub fn run<P: Publisher, const N: usize>(
        mut self,
        mut controller: Controller<'_, P, N>,
        shutdown: &ShutdownFlag,
    ) {
        for notification in self.connection.iter() {
            match notification {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Reconnected to MQTT broker: {}", self.url);
                    controller.on_connect();
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    controller.on_message(&publish.topic, &publish.payload);
                }
                Ok(Event::Incoming(Packet::Disconnect)) => controller.on_disconnect(),
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    info!("Disconnecting from broker: {}", self.url);
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    controller.on_disconnect();
                    if shutdown.is_set() {
                        break;
                    }
                    log_connection_error(&self.url, &err);
                    if !shutdown.sleep(RETRY_DELAY) {
                        break;
                    }
                }
            }
        }
        controller.on_disconnect();
    }
}

fn log_connection_error(url: &str, err: &ConnectionError) {
    match err {
        ConnectionError::ConnectionRefused(
            ConnectReturnCode::BadUserNamePassword | ConnectReturnCode::NotAuthorized,
        ) => warn!("MQTT authentication failed: {url}"),
        err => warn!("Failed to connect to broker: {url} ({err})"),
    }
}
