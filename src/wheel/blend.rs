//! Hue interpolating wheel
//!
//! The circle is split into one section per keyframe gap. Inside a section the
//! color is blended linearly from the section's first keyframe to its second.

use super::{ColorWheel, Keyframes, normalize_angle};
use crate::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct BlendWheel {
    keyframes: Keyframes,
}

impl BlendWheel {
    pub fn new(keyframes: Keyframes) -> Self {
        Self { keyframes }
    }

    pub fn keyframes(&self) -> &Keyframes {
        &self.keyframes
    }
}

impl ColorWheel for BlendWheel {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn color_at(&self, angle: f32) -> Color {
        let colors = self.keyframes.as_slice();
        let sections = self.keyframes.sections();
        if sections == 0 {
            return colors.first().copied().unwrap_or_default();
        }

        let value = normalize_angle(angle);
        let section_degrees = 360.0 / sections as f32;
        // Rounding can land exactly on 360, keep the index on the last section
        let section = ((value / section_degrees) as usize).min(sections - 1);
        let bias = (value - section as f32 * section_degrees) / section_degrees;

        colors[section].blend(colors[section + 1], bias)
    }
}
