//! Configuration for strand
//!
//! Centralized configuration with sensible defaults, loadable from a JSON
//! file or assembled through the builder.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrandError};

/// Main configuration for a strand instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Connection read timeout (milliseconds). Bounds how long a blocked
    /// read can keep the shutdown flag from being observed.
    pub read_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Strip Configuration
    // -------------------------------------------------------------------------
    /// Number of LEDs on the strip
    pub led_count: usize,

    /// Hardware driver parameters (opaque to the core; handed to the
    /// render backend)
    pub hardware: HardwareConfig,
}

/// Parameters for the ws281x driver
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Data pin (BCM numbering)
    pub gpio_pin: i32,

    /// DMA channel
    pub dma_channel: i32,

    /// Strip brightness, 0-255
    pub brightness: u8,

    /// PWM target frequency in Hz
    pub frequency: u32,

    /// Physical channel ordering of the strip
    pub strip_order: StripOrder,
}

/// Channel ordering of the physical strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripOrder {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:7805".to_string(),
            read_timeout_ms: 500,
            led_count: 189,
            hardware: HardwareConfig::default(),
        }
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            gpio_pin: 12,
            dma_channel: 10,
            brightness: 64,
            frequency: 800_000,
            strip_order: StripOrder::Rgb,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            StrandError::Config(format!("{}: {}", path.display(), e))
        })
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the number of LEDs on the strip
    pub fn led_count(mut self, count: usize) -> Self {
        self.config.led_count = count;
        self
    }

    /// Set the data pin (BCM numbering)
    pub fn gpio_pin(mut self, pin: i32) -> Self {
        self.config.hardware.gpio_pin = pin;
        self
    }

    /// Set the DMA channel
    pub fn dma_channel(mut self, channel: i32) -> Self {
        self.config.hardware.dma_channel = channel;
        self
    }

    /// Set the strip brightness (0-255)
    pub fn brightness(mut self, brightness: u8) -> Self {
        self.config.hardware.brightness = brightness;
        self
    }

    /// Set the physical channel ordering
    pub fn strip_order(mut self, order: StripOrder) -> Self {
        self.config.hardware.strip_order = order;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
