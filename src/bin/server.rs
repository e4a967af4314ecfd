//! strand Server Binary
//!
//! Starts the TCP daemon driving the LED strip.

use std::sync::atomic::Ordering;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use strand::network::Server;
use strand::Config;

#[cfg(feature = "hardware")]
use strand::render::Ws281xBridge;

#[cfg(not(feature = "hardware"))]
use strand::render::TraceBridge;

/// strand Server
#[derive(Parser, Debug)]
#[command(name = "strand-server")]
#[command(about = "TCP-driven addressable LED strip controller")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:7805")]
    listen: String,

    /// Number of LEDs on the strip
    #[arg(short = 'n', long, default_value = "189")]
    led_count: usize,

    /// Data pin (BCM numbering)
    #[arg(long, default_value = "12")]
    gpio_pin: i32,

    /// DMA channel
    #[arg(long, default_value = "10")]
    dma: i32,

    /// Strip brightness, 0-255
    #[arg(short, long, default_value = "64")]
    brightness: u8,

    /// JSON config file; overrides the flags above when given
    #[arg(short, long)]
    config: Option<String>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,strand=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("strand Server v{}", strand::VERSION);
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Strip: {} leds", config.led_count);

    let bridge = match open_bridge(&config) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("Failed to initialize render backend: {}", e);
            std::process::exit(1);
        }
    };

    let mut server = match Server::bind(config, bridge) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind listener: {}", e);
            std::process::exit(1);
        }
    };

    // SIGINT/SIGTERM request graceful shutdown; the accept loop observes
    // the flag on its next iteration.
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        shutdown.store(true, Ordering::SeqCst);
    }) {
        tracing::error!("Failed to install signal handler: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

fn build_config(args: &Args) -> strand::Result<Config> {
    if let Some(path) = &args.config {
        return Config::load(path);
    }

    Ok(Config::builder()
        .listen_addr(&args.listen)
        .led_count(args.led_count)
        .gpio_pin(args.gpio_pin)
        .dma_channel(args.dma)
        .brightness(args.brightness)
        .build())
}

#[cfg(feature = "hardware")]
fn open_bridge(config: &Config) -> strand::Result<Ws281xBridge> {
    Ws281xBridge::open(&config.hardware, config.led_count)
}

#[cfg(not(feature = "hardware"))]
fn open_bridge(_config: &Config) -> strand::Result<TraceBridge> {
    tracing::warn!("Built without the 'hardware' feature; renders are logged only");
    Ok(TraceBridge::default())
}
