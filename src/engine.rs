//! Engine Module
//!
//! The dispatch core: applies decoded commands to the strip state and
//! triggers renders.
//!
//! ## Ownership Model
//!
//! The engine is the single owner of the [`LedBuffer`]; nothing else
//! mutates it. Connections are served strictly one at a time, so no
//! locking is needed: the connection layer borrows the engine mutably
//! for the lifetime of each client.

use crate::error::Result;
use crate::protocol::Command;
use crate::render::RenderBridge;
use crate::strip::{Color, LedBuffer};

/// Applies commands to the strip buffer and renders on demand.
pub struct Engine<B> {
    /// The persistent strip state, exclusively owned
    buffer: LedBuffer,

    /// Render backend invoked on `Show`
    bridge: B,
}

impl<B: RenderBridge> Engine<B> {
    /// Create an engine for a strip of `led_count` LEDs, all off.
    pub fn new(led_count: usize, bridge: B) -> Self {
        Self {
            buffer: LedBuffer::new(led_count),
            bridge,
        }
    }

    /// Apply a single decoded command.
    ///
    /// Only `Show` can fail, by surfacing a render backend error. A
    /// failed render leaves the buffer untouched.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Clear => self.buffer.clear(),
            Command::SetPixel { index, red, green, blue } => {
                self.buffer
                    .set_pixel(index as usize, Color::from_rgb(red, green, blue));
            }
            Command::FillAll { red, green, blue } => {
                self.buffer.fill(Color::from_rgb(red, green, blue));
            }
            Command::Show => self.bridge.render(self.buffer.colors())?,
        }
        Ok(())
    }

    /// The current strip state.
    pub fn buffer(&self) -> &LedBuffer {
        &self.buffer
    }

    /// Consume the engine and return its render backend.
    pub fn into_bridge(self) -> B {
        self.bridge
    }
}
