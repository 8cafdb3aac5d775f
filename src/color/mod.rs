//! Floating point color value used by the wheel engine
//!
//! Channels are kept as `f32` in the `0..=255` range. Blending may leave
//! fractional values behind, rounding happens at the output boundary.

mod palette;

use smart_leds::{RGB, RGB8};

pub use palette::{
    BLACK, BLUE, CHRISTMAS, GREEN, HALLOWEEN, INDIGO, ORANGE, PRIMARY, RAINBOW, RED, VIOLET,
    YELLOW,
};

/// 12-bit duty cycle values for the three PWM channels
pub type Duty = RGB<u16>;

/// 8-bit color as received from the network
pub type Rgb = RGB8;

/// Upper bound of a logical color channel
pub const CHANNEL_MAX: f32 = 255.0;

/// Three channel color value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation towards `other`.
    ///
    /// `bias` of `0.0` keeps this color, `1.0` returns `other`. Values outside
    /// of that range are clamped.
    #[must_use]
    pub fn blend(self, other: Color, bias: f32) -> Color {
        let to_bias = bias.clamp(0.0, 1.0);
        let from_bias = 1.0 - to_bias;
        Color {
            r: self.r * from_bias + other.r * to_bias,
            g: self.g * from_bias + other.g * to_bias,
            b: self.b * from_bias + other.b * to_bias,
        }
    }

    /// Multiply every channel by `intensity`
    #[must_use]
    pub fn scale(self, intensity: f32) -> Color {
        Color {
            r: self.r * intensity,
            g: self.g * intensity,
            b: self.b * intensity,
        }
    }

    /// Gamma corrected output scaled to `max_output`.
    ///
    /// Each channel becomes `round(max_output * (channel / 255) ^ gamma)`.
    /// Channels are clamped to `0..=255` first so the power stays defined.
    pub fn gamma(self, gamma: f32, max_output: u16) -> Duty {
        let max = f32::from(max_output);
        let correct = |channel: f32| {
            let normalized = channel.clamp(0.0, CHANNEL_MAX) / CHANNEL_MAX;
            to_duty(libm::roundf(max * libm::powf(normalized, gamma)), max_output)
        };
        Duty {
            r: correct(self.r),
            g: correct(self.g),
            b: correct(self.b),
        }
    }

    /// Round and clamp into an 8-bit color
    pub fn to_rgb8(self) -> Rgb {
        let channel = |value: f32| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = libm::roundf(value.clamp(0.0, CHANNEL_MAX)) as u8;
            value
        };
        Rgb {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }
}

impl From<Rgb> for Color {
    fn from(color: Rgb) -> Self {
        Self {
            r: f32::from(color.r),
            g: f32::from(color.g),
            b: f32::from(color.b),
        }
    }
}

impl core::fmt::Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let rgb = self.to_rgb8();
        write!(f, "{}, {}, {}", rgb.r, rgb.g, rgb.b)
    }
}

/// Clamp a rounded float into `0..=max`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_duty(value: f32, max: u16) -> u16 {
    value.clamp(0.0, f32::from(max)) as u16
}
