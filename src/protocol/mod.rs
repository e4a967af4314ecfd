//! Protocol Module
//!
//! Defines the wire protocol clients use to drive the strip.
//!
//! ## Wire Format (all integers little-endian)
//!
//! Commands arrive in batches: a 16-bit count followed by exactly that many
//! encoded commands.
//!
//! ```text
//! ┌────────────┬───────────┬───────────┬─────┐
//! │ Count (2)  │ Command 1 │ Command 2 │ ... │
//! └────────────┴───────────┴───────────┴─────┘
//! ```
//!
//! Each command is a 1-byte tag followed by a payload whose size is fixed
//! by the tag:
//!
//! - 0x00: CLEAR - payload: empty
//! - 0x01: SET   - payload: index (1) + r (1) + g (1) + b (1)
//! - 0x02: FILL  - payload: r (1) + g (1) + b (1)
//! - 0x03: SHOW  - payload: empty
//!
//! Batches may be concatenated back-to-back in one transport read, and a
//! batch may legally span two reads; the decoder carries its position in
//! the current batch across calls so split deliveries decode identically.

mod command;
mod codec;

pub use command::{Command, CommandTag};
pub use codec::{encode_batch, StreamDecoder, BATCH_HEADER_SIZE};
