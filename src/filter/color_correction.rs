//! Per channel calibration
//!
//! LED dies differ in efficiency, scaling each duty channel evens out the
//! mixed white point.

use crate::color::{Duty, to_duty};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCorrection {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ColorCorrection {
    /// Green die of the floodlight module is noticeably brighter
    fn default() -> Self {
        Self::new(1.0, 0.75, 1.0)
    }
}

impl ColorCorrection {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn apply(&self, duty: Duty, max_duty: u16) -> Duty {
        let scale = |value: u16, factor: f32| {
            to_duty(libm::roundf(f32::from(value) * factor), max_duty)
        };
        Duty {
            r: scale(duty.r, self.r),
            g: scale(duty.g, self.g),
            b: scale(duty.b, self.b),
        }
    }
}
