//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific
//! timers. The caller is responsible for sleeping between frames.

use embassy_time::{Duration, Instant};

use crate::{OutputDriver, Renderer, color::Duty, filter::FilterProcessor};

/// Default target frame rate (30 FPS).
pub const DEFAULT_FPS: u32 = 30;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame.
    pub sleep_duration: Duration,
}

/// Portable frame scheduler that manages timing without async.
///
/// Frames are aligned to an absolute start timestamp: the sleep after each
/// frame is whatever remains of the current period, so a slow frame does not
/// push every following frame back. The alignment restarts whenever the
/// renderer switches to a new state.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(renderer, driver, Instant::now());
///
/// while running() {
///     let result = scheduler.tick(Instant::now())?;
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const STATE_CHANNEL_SIZE: usize> {
    output: O,
    renderer: Renderer<'a, STATE_CHANNEL_SIZE>,
    start: Instant,
    frame_duration: Duration,
    last_written: Option<Duty>,
}

impl<'a, O: OutputDriver, const STATE_CHANNEL_SIZE: usize>
    FrameScheduler<'a, O, STATE_CHANNEL_SIZE>
{
    /// Create a new frame scheduler paced at the renderer's tick rate.
    pub fn new(renderer: Renderer<'a, STATE_CHANNEL_SIZE>, driver: O, now: Instant) -> Self {
        let frame_duration = Duration::from_hz(u64::from(renderer.tick_rate().max(1)));
        Self {
            output: driver,
            renderer,
            start: now,
            frame_duration,
            last_written: None,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Renders the current frame, picking up a new state if one arrived
    /// 2. Writes to the output driver if the duty values changed
    /// 3. Returns the remainder of the current period
    ///
    /// A failed write is reported after the frame was consumed; the next frame
    /// retries the write.
    pub fn tick(&mut self, now: Instant) -> Result<FrameResult, O::Error> {
        let frame = self.renderer.render();
        if frame.restarted {
            self.start = now;
        }

        if self.last_written != Some(frame.duty) {
            self.last_written = None;
            self.output.write(frame.duty)?;
            self.last_written = Some(frame.duty);
        }

        Ok(self.remaining(now))
    }

    /// Time left in the current period at `now`
    pub fn remaining(&self, now: Instant) -> FrameResult {
        let period = self.frame_duration.as_ticks().max(1);
        let elapsed = now.saturating_duration_since(self.start).as_ticks();
        let sleep_duration = Duration::from_ticks(period - elapsed % period);

        FrameResult {
            next_deadline: now + sleep_duration,
            sleep_duration,
        }
    }

    /// Turn the output off, bypassing the renderer
    pub fn blackout(&mut self) -> Result<(), O::Error> {
        let dark = FilterProcessor::dark();
        self.last_written = None;
        self.renderer.power_off();
        self.output.write(dark)?;
        self.last_written = Some(dark);
        Ok(())
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &Renderer<'a, STATE_CHANNEL_SIZE> {
        &self.renderer
    }

    /// Get a mutable reference to the renderer.
    pub fn renderer_mut(&mut self) -> &mut Renderer<'a, STATE_CHANNEL_SIZE> {
        &mut self.renderer
    }

    /// Get a reference to the output driver.
    pub fn output(&self) -> &O {
        &self.output
    }
}
