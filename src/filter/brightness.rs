use crate::color::{BLACK, Color};

/// Global brightness and on/off gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessFilter {
    brightness: u8,
    power: bool,
}

impl Default for BrightnessFilter {
    fn default() -> Self {
        Self {
            brightness: 255,
            power: false,
        }
    }
}

impl BrightnessFilter {
    pub fn set(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn set_power(&mut self, power: bool) {
        self.power = power;
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn is_on(&self) -> bool {
        self.power
    }

    pub fn apply(&self, color: Color) -> Color {
        if !self.power {
            return BLACK;
        }
        color.scale(f32::from(self.brightness) / 255.0)
    }
}
