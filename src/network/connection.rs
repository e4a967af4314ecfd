//! Connection Handler
//!
//! Handles a single client connection: reads raw bytes, decodes complete
//! commands, and feeds them to the engine. Unconsumed trailing bytes are
//! retained and prefixed to the next read, so commands split across TCP
//! segments decode correctly.

use std::io::Read;
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::{Buf, BytesMut};

use crate::engine::Engine;
use crate::error::Result;
use crate::protocol::StreamDecoder;
use crate::render::RenderBridge;

/// Per-read scratch size. One read may carry many batches.
const RECV_CHUNK_SIZE: usize = 32 * 1024;

/// Handles a single client connection
pub struct Connection {
    /// The client socket
    stream: TcpStream,

    /// Bytes received but not yet decoded (tail of the last read)
    carry: BytesMut,

    /// Decoder position within the current batch
    decoder: StreamDecoder,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Configures the socket for low-latency interactive use and bounds
    /// read waits so the shutdown flag stays observable.
    pub fn new(stream: TcpStream, read_timeout_ms: u64) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(read_timeout_ms)))?;
        }

        Ok(Self {
            stream,
            carry: BytesMut::with_capacity(RECV_CHUNK_SIZE),
            decoder: StreamDecoder::new(),
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads command batches in a loop and applies them to the engine.
    /// Returns when the client disconnects or shutdown is requested.
    /// Framing and render errors abandon the buffered remainder but keep
    /// the connection open.
    pub fn handle<B: RenderBridge>(
        &mut self,
        engine: &mut Engine<B>,
        shutdown: &AtomicBool,
    ) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let mut chunk = [0u8; RECV_CHUNK_SIZE];
        loop {
            let n = match self.stream.read(&mut chunk) {
                Ok(0) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    break;
                }
                Ok(n) => n,
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    // Read timeout: nothing arrived, re-check shutdown
                    if shutdown.load(Ordering::SeqCst) {
                        tracing::debug!(
                            "Shutdown requested, dropping client {}",
                            self.peer_addr
                        );
                        break;
                    }
                    continue;
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::ConnectionReset
                        || e.kind() == std::io::ErrorKind::ConnectionAborted =>
                {
                    tracing::debug!("Connection reset by client {}", self.peer_addr);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e.into());
                }
            };

            self.carry.extend_from_slice(&chunk[..n]);

            if let Err(e) = self.drain(engine) {
                // Framing error or failed render: the rest of this read's
                // commands are abandoned, the connection stays up.
                tracing::warn!(
                    "Abandoning {} buffered bytes from {}: {}",
                    self.carry.len(),
                    self.peer_addr,
                    e
                );
                self.carry.clear();
                self.decoder.reset();
            }
        }

        if self.decoder.mid_batch() || !self.carry.is_empty() {
            tracing::warn!(
                "Client {} closed mid-command; {} trailing bytes dropped",
                self.peer_addr,
                self.carry.len()
            );
        }

        Ok(())
    }

    /// Decode and apply every complete command in the carry buffer, then
    /// retain the unconsumed tail for the next read.
    fn drain<B: RenderBridge>(&mut self, engine: &mut Engine<B>) -> Result<()> {
        let mut offset = 0;
        let result = loop {
            match self.decoder.next(&self.carry, &mut offset) {
                Ok(Some(command)) => {
                    tracing::trace!("Command from {}: {:?}", self.peer_addr, command);
                    if let Err(e) = engine.apply(command) {
                        break Err(e);
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.carry.advance(offset);
        result
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
