//! Persisted light state
//!
//! The state lives on flash, writes are debounced so that a burst of commands
//! ends up as a single write.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};
use rgb_floodlight::{EffectId, LightState, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// On-disk layout of the state file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredState {
    brightness: u8,
    color: [u8; 3],
    effect: String,
    state: bool,
    transition: u16,
}

impl From<&LightState> for StoredState {
    fn from(state: &LightState) -> Self {
        Self {
            brightness: state.brightness,
            color: [state.color.r, state.color.g, state.color.b],
            effect: state.effect.as_str().to_owned(),
            state: state.power,
            transition: state.transition,
        }
    }
}

impl TryFrom<StoredState> for LightState {
    type Error = Error;

    fn try_from(stored: StoredState) -> Result<Self> {
        let effect =
            EffectId::parse_from_str(&stored.effect).ok_or(Error::UnknownEffect(stored.effect))?;
        let [r, g, b] = stored.color;
        Ok(LightState {
            power: stored.state,
            brightness: stored.brightness,
            color: Rgb::new(r, g, b),
            effect,
            transition: stored.transition,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<LightState> {
        let contents = fs::read_to_string(&self.path)?;
        let stored: StoredState = serde_json::from_str(&contents)?;
        LightState::try_from(stored)
    }

    /// Replace the state file, going through a temporary sibling
    pub fn save(&self, state: &LightState) -> Result<()> {
        let contents = serde_json::to_string(&StoredState::from(state))?;
        let mut temporary = self.path.clone().into_os_string();
        temporary.push(".tmp");
        fs::write(&temporary, contents)?;
        fs::rename(&temporary, &self.path)?;
        Ok(())
    }
}

#[derive(Debug)]
enum Message {
    Save(LightState),
    Flush,
}

/// Cloneable handle queueing states for a [`DebouncedWriter`]
#[derive(Debug, Clone)]
pub struct SaveQueue {
    tx: mpsc::Sender<Message>,
}

impl SaveQueue {
    /// Schedule `state` for writing, restarting the quiet period
    pub fn queue(&self, state: LightState) {
        if self.tx.send(Message::Save(state)).is_err() {
            warn!("State writer has already stopped, the change is not saved");
        }
    }
}

/// Background thread writing the newest queued state after a quiet period
pub struct DebouncedWriter {
    queue: SaveQueue,
    worker: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    pub fn spawn(store: StateStore, delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("state-writer".to_owned())
            .spawn(move || run_writer(&store, &rx, delay))
            .ok();
        if worker.is_none() {
            warn!("Failed to start the state writer, changes will not be saved");
        }

        Self {
            queue: SaveQueue { tx },
            worker,
        }
    }

    pub fn queue(&self, state: LightState) {
        self.queue.queue(state);
    }

    pub fn handle(&self) -> SaveQueue {
        self.queue.clone()
    }

    /// Write any pending state now and stop the thread
    pub fn shutdown(mut self) {
        let _ = self.queue.tx.send(Message::Flush);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("State writer panicked");
            }
        }
    }
}

fn run_writer(store: &StateStore, rx: &mpsc::Receiver<Message>, delay: Duration) {
    let mut pending: Option<LightState> = None;
    loop {
        let message = if pending.is_some() {
            rx.recv_timeout(delay)
        } else {
            rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };

        match message {
            Ok(Message::Save(state)) => pending = Some(state),
            Err(RecvTimeoutError::Timeout) => {
                if let Some(state) = pending.take() {
                    write_state(store, &state);
                }
            }
            Ok(Message::Flush) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(state) = pending.take() {
                    write_state(store, &state);
                }
                return;
            }
        }
    }
}

fn write_state(store: &StateStore, state: &LightState) {
    match store.save(state) {
        Ok(()) => info!("Updated current state file '{}'.", store.path().display()),
        Err(err) => warn!(
            "Failed to write state file '{}': {err}",
            store.path().display()
        ),
    }
}
