//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! Decoding is incremental: a batch may be split across transport reads, so
//! [`StreamDecoder`] keeps the one piece of cross-read state (how many
//! commands remain in the batch currently being decoded) while the caller
//! retains any unconsumed trailing bytes and prefixes them to the next
//! read. Every offset advance is validated against the received byte count
//! before anything is dereferenced; a short region is "need more data", an
//! unknown tag is a framing error.

use super::{Command, CommandTag};
use crate::error::{Result, StrandError};

/// Batch header size: 2-byte little-endian command count
pub const BATCH_HEADER_SIZE: usize = 2;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a batch of commands to bytes
///
/// Format: count (2, LE) + each command as tag (1) + fixed payload
pub fn encode_batch(commands: &[Command]) -> Vec<u8> {
    let body: usize = commands.iter().map(Command::encoded_len).sum();

    let mut message = Vec::with_capacity(BATCH_HEADER_SIZE + body);
    message.extend_from_slice(&(commands.len() as u16).to_le_bytes());

    for command in commands {
        message.push(command.tag() as u8);
        match *command {
            Command::Clear | Command::Show => {}
            Command::SetPixel { index, red, green, blue } => {
                message.extend_from_slice(&[index, red, green, blue]);
            }
            Command::FillAll { red, green, blue } => {
                message.extend_from_slice(&[red, green, blue]);
            }
        }
    }

    message
}

// =============================================================================
// Decoding
// =============================================================================

/// Incremental decoder over a command stream.
///
/// Feed it the accumulated receive buffer and an offset; it yields one
/// decoded command per call, advancing the offset past every fully
/// consumed item (batch headers included). `Ok(None)` means the region
/// ends cleanly or mid-command: keep the bytes at and after `offset` and
/// call again once more have arrived.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Commands still expected in the batch currently being decoded.
    pending: u16,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next command from `buf` starting at `*offset`.
    ///
    /// Returns `Ok(Some(command))` with `*offset` advanced past it,
    /// `Ok(None)` if more bytes are needed, or a framing error on an
    /// unknown tag. After a framing error the caller must discard the
    /// buffered remainder and [`reset`](Self::reset) the decoder; the next
    /// batch boundary cannot be located once framing is lost.
    pub fn next(&mut self, buf: &[u8], offset: &mut usize) -> Result<Option<Command>> {
        // Consume batch headers until one announces commands. Empty
        // batches are legal.
        while self.pending == 0 {
            let Some(header) = buf.get(*offset..*offset + BATCH_HEADER_SIZE) else {
                return Ok(None);
            };
            self.pending = u16::from_le_bytes([header[0], header[1]]);
            *offset += BATCH_HEADER_SIZE;
        }

        let Some(&tag_byte) = buf.get(*offset) else {
            return Ok(None);
        };
        let tag = CommandTag::from_byte(tag_byte).ok_or_else(|| {
            StrandError::Frame(format!("unknown command tag: 0x{:02x}", tag_byte))
        })?;

        let Some(encoded) = buf.get(*offset..*offset + tag.encoded_len()) else {
            return Ok(None);
        };

        let command = match tag {
            CommandTag::Clear => Command::Clear,
            CommandTag::SetPixel => Command::SetPixel {
                index: encoded[1],
                red: encoded[2],
                green: encoded[3],
                blue: encoded[4],
            },
            CommandTag::FillAll => Command::FillAll {
                red: encoded[1],
                green: encoded[2],
                blue: encoded[3],
            },
            CommandTag::Show => Command::Show,
        };

        *offset += tag.encoded_len();
        self.pending -= 1;
        Ok(Some(command))
    }

    /// True while a batch has announced commands that have not all been
    /// decoded yet.
    pub fn mid_batch(&self) -> bool {
        self.pending > 0
    }

    /// Forget any in-progress batch, e.g. after a framing error.
    pub fn reset(&mut self) {
        self.pending = 0;
    }
}
