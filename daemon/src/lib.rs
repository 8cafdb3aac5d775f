//! Raspberry Pi service driving an RGB floodlight from Home Assistant over
//! MQTT.
//!
//! The render loop runs on the main thread and receives desired states from
//! the MQTT thread through a bounded channel. A sensor thread watches the
//! board temperature and forces the output dark while it is too hot.

pub mod app;
pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod mqtt;
pub mod sensors;
pub mod shutdown;
pub mod state_store;

pub use error::{Error, Result};
