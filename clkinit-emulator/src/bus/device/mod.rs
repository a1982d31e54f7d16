pub mod pca9548;
pub mod si5324;

use std::any::Any;

/// A device on the emulated I2C bus.
pub trait I2CDevice: Any {
    /// Returns the 7-bit address.
    fn address(&self) -> u8;

    /// Called on a START condition.
    fn start(&mut self) {}

    /// Called when the address byte matches; returns whether the device acknowledges it.
    fn address_match(&mut self, read: bool) -> bool {
        !read
    }

    /// Called for each data octet of a transaction addressed to this device; returns whether it is acknowledged.
    fn write(&mut self, byte: u8) -> bool;

    /// Called on a STOP condition.
    fn stop(&mut self) {}

    /// Advances the device by one tick.
    fn update(&mut self) {}

    /// Returns the enabled downstream channels if the device is an I2C switch.
    fn channels(&self) -> Option<u8> {
        None
    }

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}
