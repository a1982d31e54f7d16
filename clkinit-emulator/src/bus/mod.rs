mod device;
mod i2c;

use clkinit_core::bus::{BusCommand, BusStatus, XferFlags, I2C_CONFIG_ADDR, I2C_XFER_ADDR};

pub use device::{pca9548::Pca9548Emulator, si5324::Si5324Emulator, I2CDevice};
pub use i2c::{BusEvent, I2CMasterEmulator, Latency, MAX_EVENTS};

/// A controller of the control bus.
///
/// Requests return immediately; their completion is observed through [`BusController::status`] on a later tick.
/// Issuing a request while the controller is [`BusStatus::Busy`] is a caller error.
pub trait BusController {
    /// Returns whether a request is in flight.
    fn status(&self) -> BusStatus;
    /// Returns whether the last written octet was acknowledged.
    fn acked(&self) -> bool;
    /// Returns the configured clock width.
    fn clock_width(&self) -> u32;
    /// Configures the clock width. Takes effect immediately.
    fn configure(&mut self, clock_width: u32);
    /// Issues a START condition.
    fn start(&mut self);
    /// Writes an octet.
    fn write_byte(&mut self, byte: u8);
    /// Issues a STOP condition.
    fn stop(&mut self);
    /// Advances the controller by one tick.
    fn update(&mut self);

    /// Returns the longest time in ticks that a healthy request keeps the controller busy.
    fn max_request_ticks(&self) -> u64 {
        0
    }

    /// Reads a controller register.
    fn read_register(&self, address: u8) -> u32 {
        match address {
            I2C_XFER_ADDR => {
                let mut flags = XferFlags::empty();
                flags.set(XferFlags::IDLE, self.status() == BusStatus::Idle);
                flags.set(XferFlags::ACK, self.acked());
                flags.bits()
            }
            I2C_CONFIG_ADDR => self.clock_width(),
            _ => {
                tracing::warn!("Read from unknown bus register {:#04X}", address);
                0
            }
        }
    }

    /// Writes a controller register.
    fn write_register(&mut self, address: u8, value: u32) {
        match address {
            I2C_XFER_ADDR => match BusCommand::decode(value) {
                Some(BusCommand::Start) => self.start(),
                Some(BusCommand::Write(byte)) => self.write_byte(byte),
                Some(BusCommand::Stop) => self.stop(),
                Some(cmd @ BusCommand::Read { .. }) => {
                    tracing::warn!("{:?} is not supported by this controller", cmd);
                }
                None => {
                    tracing::warn!("Invalid transfer command {:#06X}", value);
                }
            },
            I2C_CONFIG_ADDR => self.configure(value),
            _ => {
                tracing::warn!("Write to unknown bus register {:#04X}", address);
            }
        }
    }
}
