//! Closed form rainbow built from three cosine ramps
//!
//! Red, green and blue each rise and fall over 240° with the bands offset by
//! 120°, so no keyframe table is needed.

use super::{ColorWheel, normalize_angle};
use crate::color::Color;

const HALF_SCALE: f32 = 255.0 / 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SineWheel;

/// `(1 + cos)` when `rising` is false, `(1 - cos)` otherwise
fn ramp(band_angle: f32, rising: bool) -> f32 {
    let cos = libm::cosf((band_angle * 1.5).to_radians());
    let shape = if rising { 1.0 - cos } else { 1.0 + cos };
    libm::roundf(shape * HALF_SCALE)
}

impl ColorWheel for SineWheel {
    fn color_at(&self, angle: f32) -> Color {
        let value = normalize_angle(angle);

        let red = if value < 120.0 {
            ramp(value, false)
        } else if value >= 240.0 {
            ramp(value - 240.0, true)
        } else {
            0.0
        };
        let green = if value < 240.0 { ramp(value, true) } else { 0.0 };
        let blue = if value < 120.0 {
            0.0
        } else {
            ramp(value - 120.0, true)
        };

        Color::new(red, green, blue)
    }
}
