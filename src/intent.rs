//! Desired light state and the changes requested against it.

use core::fmt;

use crate::channel::{Channel, Receiver, Sender};
use crate::color::Rgb;
use crate::wheel::EffectId;

/// Seconds per wheel revolution used when nothing else was requested
pub const DEFAULT_TRANSITION_SECS: u16 = 120;

/// Full desired state of the light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightState {
    pub power: bool,
    pub brightness: u8,
    /// User color, used by the single color effects
    pub color: Rgb,
    pub effect: EffectId,
    /// Seconds for one full turn of the wheel
    pub transition: u16,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            power: true,
            brightness: 255,
            color: Rgb::new(255, 0, 255),
            effect: EffectId::PrimaryBlend,
            transition: DEFAULT_TRANSITION_SECS,
        }
    }
}

/// Represents a user intent to change the light state.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightStateIntent {
    pub power: Option<bool>,
    pub brightness: Option<u8>,
    pub color: Option<Rgb>,
    pub effect: Option<EffectId>,
    pub transition: Option<u16>,
}

impl LightStateIntent {
    pub const fn is_empty(&self) -> bool {
        self.power.is_none()
            && self.brightness.is_none()
            && self.color.is_none()
            && self.effect.is_none()
            && self.transition.is_none()
    }
}

impl LightState {
    /// Apply an intent, returning the new state.
    pub fn apply(&self, intent: &LightStateIntent) -> LightState {
        LightState {
            power: intent.power.unwrap_or(self.power),
            brightness: intent.brightness.unwrap_or(self.brightness),
            color: intent.color.unwrap_or(self.color),
            effect: intent.effect.unwrap_or(self.effect),
            transition: intent.transition.unwrap_or(self.transition),
        }
    }

    /// Fields of `next` that differ from `self`
    pub fn changes_to<'a>(&self, next: &'a LightState) -> StateChanges<'a> {
        StateChanges {
            power: self.power != next.power,
            brightness: self.brightness != next.brightness,
            color: self.color != next.color,
            effect: self.effect != next.effect,
            transition: self.transition != next.transition,
            state: next,
        }
    }
}

/// Difference between two states, formatted as `State=On, Brightness=12`
#[derive(Debug, Clone, Copy)]
pub struct StateChanges<'a> {
    power: bool,
    brightness: bool,
    color: bool,
    effect: bool,
    transition: bool,
    state: &'a LightState,
}

impl StateChanges<'_> {
    pub const fn is_empty(&self) -> bool {
        !(self.power || self.brightness || self.color || self.effect || self.transition)
    }
}

impl fmt::Display for StateChanges<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn separate(f: &mut fmt::Formatter<'_>, first: &mut bool) -> fmt::Result {
            if !core::mem::replace(first, false) {
                f.write_str(", ")?;
            }
            Ok(())
        }

        let state = self.state;
        let mut first = true;
        if self.power {
            separate(f, &mut first)?;
            let power = if state.power { "On" } else { "Off" };
            write!(f, "State={power}")?;
        }
        if self.brightness {
            separate(f, &mut first)?;
            write!(f, "Brightness={}", state.brightness)?;
        }
        if self.color {
            separate(f, &mut first)?;
            let color = state.color;
            write!(f, "Color=({}, {}, {})", color.r, color.g, color.b)?;
        }
        if self.effect {
            separate(f, &mut first)?;
            write!(f, "Effect=\"{}\"", state.effect)?;
        }
        if self.transition {
            separate(f, &mut first)?;
            write!(f, "Transition={}", state.transition)?;
        }
        Ok(())
    }
}

/// Type alias for the desired state channel
pub type StateChannel<const SIZE: usize> = Channel<LightState, SIZE>;

/// Type alias for the desired state sender
pub type StateSender<'a, const SIZE: usize> = Sender<'a, LightState, SIZE>;

/// Type alias for the desired state receiver
pub type StateReceiver<'a, const SIZE: usize> = Receiver<'a, LightState, SIZE>;
