//! TCP Server
//!
//! Binds the listener and runs the sequential accept loop. One client is
//! served at a time; a new connection is only accepted after the previous
//! one closes. The strip is a single physical output, so there is nothing
//! to serve two clients with.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::network::Connection;
use crate::render::RenderBridge;

/// How often the accept loop re-checks the shutdown flag
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for strand
pub struct Server<B> {
    config: Config,
    engine: Engine<B>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl<B: RenderBridge> Server<B> {
    /// Bind the listen address and build the engine.
    ///
    /// A bind failure is a fatal startup error for the caller to handle.
    pub fn bind(config: Config, bridge: B) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        let engine = Engine::new(config.led_count, bridge);

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The bound listen address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle for requesting shutdown, e.g. from a signal handler.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the accept loop (blocking)
    ///
    /// Returns once the shutdown flag is set and the active connection,
    /// if any, has closed.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Listening on {}, strip of {} leds",
            self.config.listen_addr,
            self.config.led_count
        );

        while !self.shutdown.load(Ordering::SeqCst) {
            let (stream, _) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL_INTERVAL);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    continue;
                }
            };

            // The listener is non-blocking for shutdown polling; the
            // accepted socket must block normally.
            stream.set_nonblocking(false)?;

            let mut connection = Connection::new(stream, self.config.read_timeout_ms)?;
            if let Err(e) = connection.handle(&mut self.engine, &self.shutdown) {
                tracing::warn!(
                    "Connection from {} ended with error: {}",
                    connection.peer_addr(),
                    e
                );
            }
        }

        tracing::info!("Shutdown flag set, accept loop stopping");
        Ok(())
    }

    /// The engine, e.g. for inspecting strip state after `run` returns.
    pub fn engine(&self) -> &Engine<B> {
        &self.engine
    }
}
