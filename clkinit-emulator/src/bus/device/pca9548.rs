use std::any::Any;

use clkinit_core::si5324::PCA9548_ADDR;

use super::I2CDevice;

/// An emulated PCA9548 8-channel I2C switch.
///
/// The single data octet of a write is the channel enable mask.
#[derive(Debug, Default)]
pub struct Pca9548Emulator {
    channels: u8,
}

impl Pca9548Emulator {
    /// Creates a new switch with all channels disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self { channels: 0 }
    }

    /// Returns whether `channel` is enabled.
    #[must_use]
    pub const fn is_enabled(&self, channel: u8) -> bool {
        self.channels & (1 << channel) != 0
    }
}

impl I2CDevice for Pca9548Emulator {
    fn address(&self) -> u8 {
        PCA9548_ADDR
    }

    fn write(&mut self, byte: u8) -> bool {
        tracing::debug!("PCA9548 channels set to {:#010b}", byte);
        self.channels = byte;
        true
    }

    fn channels(&self) -> Option<u8> {
        Some(self.channels)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
