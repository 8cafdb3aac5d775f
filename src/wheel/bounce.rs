//! Intensity pulsing wheel
//!
//! Every section shows a single keyframe. Its intensity follows
//! `|cos(angle * sections / 2)|`, peaking at the section center and dropping
//! to zero at the boundaries.

use super::{ColorWheel, Keyframes, normalize_angle};
use crate::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct BounceWheel {
    keyframes: Keyframes,
}

impl BounceWheel {
    pub fn new(keyframes: Keyframes) -> Self {
        Self { keyframes }
    }

    pub fn keyframes(&self) -> &Keyframes {
        &self.keyframes
    }

    /// Intensity factor for an already normalized angle
    #[allow(clippy::cast_precision_loss)]
    pub fn intensity(&self, value: f32) -> f32 {
        let half_sections = self.keyframes.sections() as f32 / 2.0;
        libm::fabsf(libm::cosf((value * half_sections).to_radians()))
    }
}

impl ColorWheel for BounceWheel {
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
        // Shifted by half a section so the peak lands on the keyframe color
        let shifted = value + section_degrees / 2.0;
        let section = ((shifted / section_degrees) as usize).min(sections);

        colors[section].scale(self.intensity(value))
    }
}
