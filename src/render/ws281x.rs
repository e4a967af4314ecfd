//! ws281x hardware backend
//!
//! Drives a physical strip through the rpi_ws281x PWM/DMA driver. Only
//! compiled with the `hardware` feature; initialization needs root and a
//! Raspberry Pi.

use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, StripType};

use super::RenderBridge;
use crate::config::{HardwareConfig, StripOrder};
use crate::error::{Result, StrandError};
use crate::strip::Color;

/// Render backend backed by the ws281x driver.
///
/// The driver's GPIO/DMA state is torn down when the bridge is dropped.
pub struct Ws281xBridge {
    controller: Controller,
}

impl Ws281xBridge {
    /// Initialize the driver for a strip of `led_count` LEDs on channel 0.
    ///
    /// Failure here is a fatal startup error for the daemon.
    pub fn open(hardware: &HardwareConfig, led_count: usize) -> Result<Self> {
        let controller = ControllerBuilder::new()
            .freq(hardware.frequency)
            .dma(hardware.dma_channel)
            .channel(
                0,
                ChannelBuilder::new()
                    .pin(hardware.gpio_pin)
                    .count(led_count as i32)
                    .strip_type(strip_type(hardware.strip_order))
                    .brightness(hardware.brightness)
                    .invert(false)
                    .build(),
            )
            .build()
            .map_err(|e| StrandError::Render(format!("ws281x init failed: {e}")))?;

        Ok(Self { controller })
    }
}

impl RenderBridge for Ws281xBridge {
    fn render(&mut self, colors: &[Color]) -> Result<()> {
        let leds = self.controller.leds_mut(0);
        for (led, color) in leds.iter_mut().zip(colors) {
            // Driver raw layout is [B, G, R, W].
            *led = [color.blue(), color.green(), color.red(), 0];
        }

        self.controller
            .render()
            .map_err(|e| StrandError::Render(format!("ws281x render failed: {e}")))
    }
}

fn strip_type(order: StripOrder) -> StripType {
    match order {
        StripOrder::Rgb => StripType::Ws2811Rgb,
        StripOrder::Rbg => StripType::Ws2811Rbg,
        StripOrder::Grb => StripType::Ws2811Grb,
        StripOrder::Gbr => StripType::Ws2811Gbr,
        StripOrder::Brg => StripType::Ws2811Brg,
        StripOrder::Bgr => StripType::Ws2811Bgr,
    }
}
