//! Color wheels with compile-time known variants
//!
//! A wheel maps an angle in degrees to a [`Color`]. Wheels are pure: all
//! animation state (the angle) lives in the renderer. All variants are stored
//! in an enum to avoid heap allocations.

mod blend;
mod bounce;
mod keyframes;
mod sine;

pub use blend::BlendWheel;
pub use bounce::BounceWheel;
pub use keyframes::{KeyframeError, Keyframes, MAX_KEYFRAMES};
pub use sine::SineWheel;

use crate::color::{CHRISTMAS, Color, HALLOWEEN, PRIMARY, RAINBOW};

const EFFECT_NAME_SINGLE_COLOR: &str = "Single Color";
const EFFECT_NAME_SINGLE_COLOR_BOUNCE: &str = "Single Color Bounce";
const EFFECT_NAME_PRIMARY_BOUNCE: &str = "Primary Bounce";
const EFFECT_NAME_PRIMARY_BLEND: &str = "Primary Blend";
const EFFECT_NAME_RAINBOW_BOUNCE: &str = "Rainbow Bounce";
const EFFECT_NAME_RAINBOW_BLEND: &str = "Rainbow Blend";
const EFFECT_NAME_CHRISTMAS: &str = "Christmas";
const EFFECT_NAME_HALLOWEEN: &str = "Halloween";
const EFFECT_NAME_CHRISTMAS_BLEND: &str = "Christmas Blend";
const EFFECT_NAME_HALLOWEEN_BLEND: &str = "Halloween Blend";
const EFFECT_NAME_SINE: &str = "Sine Wheel";

/// Map an angle into `[0, 360)`.
///
/// Negative angles wrap from the top. Non-finite input maps to `0`.
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut value = libm::fmodf(angle, 360.0);
    if value < 0.0 {
        value += 360.0;
    }
    value
}

pub trait ColorWheel {
    /// Color at `angle` degrees
    fn color_at(&self, angle: f32) -> Color;
}

/// Wheel slot - enum containing all possible wheels
#[derive(Debug, Clone, PartialEq)]
pub enum WheelSlot {
    /// One color regardless of the angle
    Single(Color),
    /// Hue interpolation between keyframes
    Blend(BlendWheel),
    /// Intensity pulse per keyframe
    Bounce(BounceWheel),
    /// Closed form cosine rainbow
    Sine(SineWheel),
}

impl Default for WheelSlot {
    fn default() -> Self {
        EffectId::default().to_wheel(Color::default())
    }
}

impl ColorWheel for WheelSlot {
    fn color_at(&self, angle: f32) -> Color {
        match self {
            Self::Single(color) => *color,
            Self::Blend(wheel) => wheel.color_at(angle),
            Self::Bounce(wheel) => wheel.color_at(angle),
            Self::Sine(wheel) => wheel.color_at(angle),
        }
    }
}

impl WheelSlot {
    /// Blend wheel over a validated keyframe list.
    ///
    /// A one color list collapses into [`WheelSlot::Single`].
    pub fn blend(keyframes: Keyframes) -> Self {
        match keyframes.as_slice() {
            [color] => Self::Single(*color),
            _ => Self::Blend(BlendWheel::new(keyframes)),
        }
    }

    pub fn bounce(keyframes: Keyframes) -> Self {
        Self::Bounce(BounceWheel::new(keyframes))
    }
}

/// Known effects that can be requested by name.
///
/// The declaration order is the order advertised to Home Assistant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectId {
    SingleColor,
    SingleColorBounce,
    PrimaryBounce,
    #[default]
    PrimaryBlend,
    RainbowBounce,
    RainbowBlend,
    Christmas,
    Halloween,
    ChristmasBlend,
    HalloweenBlend,
    Sine,
}

impl EffectId {
    /// Every effect in publication order
    pub const ALL: [EffectId; 11] = [
        Self::SingleColor,
        Self::SingleColorBounce,
        Self::PrimaryBounce,
        Self::PrimaryBlend,
        Self::RainbowBounce,
        Self::RainbowBlend,
        Self::Christmas,
        Self::Halloween,
        Self::ChristmasBlend,
        Self::HalloweenBlend,
        Self::Sine,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleColor => EFFECT_NAME_SINGLE_COLOR,
            Self::SingleColorBounce => EFFECT_NAME_SINGLE_COLOR_BOUNCE,
            Self::PrimaryBounce => EFFECT_NAME_PRIMARY_BOUNCE,
            Self::PrimaryBlend => EFFECT_NAME_PRIMARY_BLEND,
            Self::RainbowBounce => EFFECT_NAME_RAINBOW_BOUNCE,
            Self::RainbowBlend => EFFECT_NAME_RAINBOW_BLEND,
            Self::Christmas => EFFECT_NAME_CHRISTMAS,
            Self::Halloween => EFFECT_NAME_HALLOWEEN,
            Self::ChristmasBlend => EFFECT_NAME_CHRISTMAS_BLEND,
            Self::HalloweenBlend => EFFECT_NAME_HALLOWEEN_BLEND,
            Self::Sine => EFFECT_NAME_SINE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_SINGLE_COLOR => Some(Self::SingleColor),
            EFFECT_NAME_SINGLE_COLOR_BOUNCE => Some(Self::SingleColorBounce),
            EFFECT_NAME_PRIMARY_BOUNCE => Some(Self::PrimaryBounce),
            EFFECT_NAME_PRIMARY_BLEND => Some(Self::PrimaryBlend),
            EFFECT_NAME_RAINBOW_BOUNCE => Some(Self::RainbowBounce),
            EFFECT_NAME_RAINBOW_BLEND => Some(Self::RainbowBlend),
            EFFECT_NAME_CHRISTMAS => Some(Self::Christmas),
            EFFECT_NAME_HALLOWEEN => Some(Self::Halloween),
            EFFECT_NAME_CHRISTMAS_BLEND => Some(Self::ChristmasBlend),
            EFFECT_NAME_HALLOWEEN_BLEND => Some(Self::HalloweenBlend),
            EFFECT_NAME_SINE => Some(Self::Sine),
            _ => None,
        }
    }

    /// Build the wheel for this effect.
    ///
    /// Only the single color effects use `color`, the others run on their
    /// fixed palette.
    pub fn to_wheel(self, color: Color) -> WheelSlot {
        match self {
            Self::SingleColor => WheelSlot::Single(color),
            Self::SingleColorBounce => WheelSlot::bounce(Keyframes::repeated(color)),
            Self::PrimaryBounce => WheelSlot::bounce(Keyframes::palette(&PRIMARY)),
            Self::PrimaryBlend => WheelSlot::blend(Keyframes::palette(&PRIMARY)),
            Self::RainbowBounce => WheelSlot::bounce(Keyframes::palette(&RAINBOW)),
            Self::RainbowBlend => WheelSlot::blend(Keyframes::palette(&RAINBOW)),
            Self::Christmas => WheelSlot::bounce(Keyframes::palette(&CHRISTMAS)),
            Self::Halloween => WheelSlot::bounce(Keyframes::palette(&HALLOWEEN)),
            Self::ChristmasBlend => WheelSlot::blend(Keyframes::palette(&CHRISTMAS)),
            Self::HalloweenBlend => WheelSlot::blend(Keyframes::palette(&HALLOWEEN)),
            Self::Sine => WheelSlot::Sine(SineWheel),
        }
    }
}

impl core::fmt::Display for EffectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
