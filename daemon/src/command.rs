//! JSON light schema payloads exchanged with Home Assistant

use rgb_floodlight::{EffectId, LightState, LightStateIntent, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::CommandError;

pub const PAYLOAD_ON: &str = "ON";
pub const PAYLOAD_OFF: &str = "OFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPayload {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Rgb> for ColorPayload {
    fn from(color: Rgb) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

/// Incoming command, every key is optional
#[derive(Debug, Deserialize)]
struct CommandPayload {
    brightness: Option<f64>,
    color: Option<RawColor>,
    effect: Option<String>,
    state: Option<String>,
    transition: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawColor {
    r: f64,
    g: f64,
    b: f64,
}

/// Decode a command into the fields it changes.
///
/// Numbers are rounded and clamped to their range. Any `state` other than
/// `ON` (case-insensitive) switches the light off.
pub fn parse_command(payload: &[u8]) -> Result<LightStateIntent, CommandError> {
    let command: CommandPayload = serde_json::from_slice(payload)?;

    let effect = command
        .effect
        .map(|name| EffectId::parse_from_str(&name).ok_or(CommandError::UnknownEffect(name)))
        .transpose()?;

    Ok(LightStateIntent {
        power: command
            .state
            .map(|state| state.eq_ignore_ascii_case(PAYLOAD_ON)),
        brightness: command.brightness.map(to_u8),
        color: command
            .color
            .map(|color| Rgb::new(to_u8(color.r), to_u8(color.g), to_u8(color.b))),
        effect,
        transition: command.transition.map(to_u16),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(u8::MAX)) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u16(value: f64) -> u16 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Outgoing state document, every key present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    pub brightness: u8,
    pub color: ColorPayload,
    pub effect: String,
    pub state: String,
    pub transition: u16,
}

impl From<&LightState> for StatePayload {
    fn from(state: &LightState) -> Self {
        let power = if state.power { PAYLOAD_ON } else { PAYLOAD_OFF };
        Self {
            brightness: state.brightness,
            color: state.color.into(),
            effect: state.effect.as_str().to_owned(),
            state: power.to_owned(),
            transition: state.transition,
        }
    }
}

impl StatePayload {
    pub fn to_json(&self) -> String {
        // A struct of plain fields always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}
