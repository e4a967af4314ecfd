//! Render backends
//!
//! The bridge between the in-memory strip state and whatever actually
//! displays it. The dispatch loop calls [`RenderBridge::render`] only in
//! response to a `Show` command, always with the full current buffer,
//! never a delta.

use crate::error::Result;
use crate::strip::Color;

#[cfg(feature = "hardware")]
mod ws281x;

#[cfg(feature = "hardware")]
pub use ws281x::Ws281xBridge;

/// A render backend for the LED strip.
pub trait RenderBridge {
    /// Push the buffer to the output. Failure is reported, never swallowed.
    fn render(&mut self, colors: &[Color]) -> Result<()>;
}

/// Default backend when no hardware is attached: logs each render.
///
/// Keeps the daemon fully exercisable on a development host.
#[derive(Debug, Default)]
pub struct TraceBridge {
    frames: u64,
}

impl RenderBridge for TraceBridge {
    fn render(&mut self, colors: &[Color]) -> Result<()> {
        self.frames += 1;
        tracing::debug!(
            "render #{}: {} leds, first={:#08x}",
            self.frames,
            colors.len(),
            colors.first().map(|c| c.packed()).unwrap_or(0)
        );
        Ok(())
    }
}
