#![no_std]

pub mod channel;
pub mod color;
pub mod filter;
pub mod frame_scheduler;
pub mod intent;
pub mod pca9685;
pub mod renderer;
pub mod wheel;

pub use color::{Color, Duty, Rgb};
pub use filter::{ColorCorrection, FilterProcessorConfig};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use intent::{
    LightState, LightStateIntent, StateChannel, StateChanges, StateReceiver, StateSender,
};
pub use pca9685::Pca9685;
pub use renderer::{Frame, Renderer, RendererConfig};
pub use wheel::{ColorWheel, EffectId, Keyframes, WheelSlot};

pub use embassy_time::{Duration, Instant};

/// Abstract PWM output trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    type Error;

    /// Write duty values of the red, green and blue channels
    fn write(&mut self, duty: Duty) -> Result<(), Self::Error>;
}
