//! # strand
//!
//! A TCP daemon that drives an addressable LED strip from a compact
//! binary command protocol:
//! - Batched commands (clear / set pixel / fill / show), little-endian
//! - Incremental decoding that survives TCP fragmentation
//! - A persistent in-memory color buffer pushed to hardware on `Show`
//! - Pluggable render backends (ws281x hardware, or a logging stand-in)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                             │
//! │               (one client at a time)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ raw bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Stream Decoder                             │
//! │         (batches → commands, carry-over aware)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ commands
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Engine                                  │
//! │            (owns the LED color buffer)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Show
//!                       ▼
//!               ┌───────────────┐
//!               │ Render Bridge │
//!               │   (ws281x)    │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod strip;
pub mod protocol;
pub mod render;
pub mod engine;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StrandError};
pub use config::Config;
pub use engine::Engine;
pub use strip::{Color, LedBuffer};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of strand
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
