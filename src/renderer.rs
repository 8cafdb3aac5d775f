#[cfg(feature = "log")]
use log::info;

use crate::color::{Color, Duty};
use crate::filter::{FilterProcessor, FilterProcessorConfig};
use crate::frame_scheduler::DEFAULT_FPS;
use crate::intent::{LightState, StateReceiver};
use crate::wheel::{ColorWheel, WheelSlot};

/// Configuration for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    /// Frames per second the renderer is ticked at
    pub tick_rate: u32,
    pub filters: FilterProcessorConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_FPS,
            filters: FilterProcessorConfig::default(),
        }
    }
}

/// Output of a single render step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub duty: Duty,
    /// A new state was applied before this frame and the wheel restarted
    pub restarted: bool,
}

/// Renderer - walks the selected wheel one angle step per frame
pub struct Renderer<'a, const STATE_CHANNEL_SIZE: usize> {
    // External dependencies and configuration
    states: StateReceiver<'a, STATE_CHANNEL_SIZE>,
    tick_rate: u32,

    // Internal state
    state: LightState,
    pending: Option<LightState>,
    wheel: WheelSlot,
    angle: f32,
    safety_cutoff: bool,

    // Internal dependencies
    filters: FilterProcessor,
}

impl<'a, const STATE_CHANNEL_SIZE: usize> Renderer<'a, STATE_CHANNEL_SIZE> {
    /// Create a renderer that starts from `initial` on its first frame
    pub fn new(
        states: StateReceiver<'a, STATE_CHANNEL_SIZE>,
        config: &RendererConfig,
        initial: LightState,
    ) -> Self {
        Self {
            states,
            tick_rate: config.tick_rate.max(1),
            state: initial,
            pending: Some(initial),
            wheel: initial.effect.to_wheel(Color::from(initial.color)),
            angle: 0.0,
            safety_cutoff: false,
            filters: FilterProcessor::new(&config.filters),
        }
    }

    /// Process one frame
    ///
    /// Picks up the newest desired state, evaluates the wheel at the current
    /// angle and advances the angle by one step.
    pub fn render(&mut self) -> Frame {
        if let Some(next) = self.states.receive_latest() {
            self.pending = Some(next);
        }
        let restarted = match self.pending.take() {
            Some(next) => {
                self.switch_state(next);
                true
            }
            None => false,
        };

        let duty = if self.safety_cutoff {
            FilterProcessor::dark()
        } else {
            self.filters.process(self.wheel.color_at(self.angle))
        };

        self.angle += self.step();
        if self.angle > 360.0 {
            self.angle -= 360.0;
        }

        Frame { duty, restarted }
    }

    /// Degrees the wheel advances per frame
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&self) -> f32 {
        let transition = u32::from(self.state.transition.max(1));
        360.0 / transition.saturating_mul(self.tick_rate) as f32
    }

    /// Force the output dark while `active`, the wheel keeps turning
    pub fn set_safety_cutoff(&mut self, active: bool) {
        self.safety_cutoff = active;
    }

    /// Switch the output off, until the next state arrives
    pub fn power_off(&mut self) {
        self.filters.brightness.set_power(false);
    }

    pub const fn state(&self) -> &LightState {
        &self.state
    }

    pub const fn angle(&self) -> f32 {
        self.angle
    }

    pub const fn wheel(&self) -> &WheelSlot {
        &self.wheel
    }

    pub const fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Hard cut to `next`: fresh wheel, angle back to zero
    fn switch_state(&mut self, next: LightState) {
        #[cfg(feature = "log")]
        {
            let changes = self.state.changes_to(&next);
            if !changes.is_empty() {
                info!("State changed to {changes}.");
            }
        }

        self.state = next;
        self.angle = 0.0;
        self.wheel = next.effect.to_wheel(Color::from(next.color));
        self.filters.brightness.set(next.brightness);
        self.filters.brightness.set_power(next.power);
    }
}
