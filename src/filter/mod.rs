//! Output pipeline turning a wheel color into PWM duty values
//!
//! Processing order:
//! 1. Brightness scaling and power gate
//! 2. Gamma correction to the duty range
//! 3. Per channel calibration

mod brightness;
mod color_correction;

pub use brightness::BrightnessFilter;
pub use color_correction::ColorCorrection;

use crate::color::{Color, Duty};

/// Full scale of the PCA9685 12-bit counters
pub const MAX_DUTY: u16 = 4095;

/// Default gamma exponent of the floodlight LEDs
pub const DEFAULT_GAMMA: f32 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterProcessorConfig {
    /// Gamma exponent, `1.0` keeps the output linear
    pub gamma: f32,
    /// Duty value of a full channel
    pub max_duty: u16,
    /// Per channel calibration
    pub color_correction: ColorCorrection,
}

impl Default for FilterProcessorConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            max_duty: MAX_DUTY,
            color_correction: ColorCorrection::default(),
        }
    }
}

/// Filter processor - applies post-processing to wheel colors
#[derive(Debug, Clone)]
pub struct FilterProcessor {
    pub brightness: BrightnessFilter,
    pub color_correction: ColorCorrection,
    gamma: f32,
    max_duty: u16,
}

impl FilterProcessor {
    pub fn new(config: &FilterProcessorConfig) -> Self {
        Self {
            brightness: BrightnessFilter::default(),
            color_correction: config.color_correction,
            gamma: config.gamma,
            max_duty: config.max_duty,
        }
    }

    /// Run a color through every stage
    pub fn process(&self, color: Color) -> Duty {
        let color = self.brightness.apply(color);
        let duty = color.gamma(self.gamma, self.max_duty);
        self.color_correction.apply(duty, self.max_duty)
    }

    /// Duty values with every channel off
    pub const fn dark() -> Duty {
        Duty { r: 0, g: 0, b: 0 }
    }
}
