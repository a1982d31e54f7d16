/// The register address of the I2C transfer register.
///
/// Writing a [`XferFlags`] command word to it issues a bus request, reading it returns the bus status.
pub const I2C_XFER_ADDR: u8 = 0;
/// The register address of the I2C configuration register, which holds the clock width.
pub const I2C_CONFIG_ADDR: u8 = 1;

bitflags::bitflags! {
    /// Command and status bits of the transfer register.
    ///
    /// The low 8 bits of the register word carry the data octet of a write.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct XferFlags : u32 {
        /// The last octet was acknowledged.
        const ACK   = 1 << 8;
        /// Read an octet.
        const READ  = 1 << 9;
        /// Write the octet in the low 8 bits.
        const WRITE = 1 << 10;
        /// Issue a STOP condition.
        const STOP  = 1 << 11;
        /// Issue a START condition.
        const START = 1 << 12;
        /// The bus is idle.
        const IDLE  = 1 << 13;
    }
}

/// The status of the bus controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BusStatus {
    /// No request in flight.
    Idle,
    /// A request is in flight.
    Busy,
}

/// A single bus request decoded from a transfer register word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BusCommand {
    /// START condition.
    Start,
    /// Write an octet.
    Write(u8),
    /// Read an octet, acknowledging it if `ack` is set.
    Read {
        /// Whether the master acknowledges the read octet.
        ack: bool,
    },
    /// STOP condition.
    Stop,
}

impl BusCommand {
    /// Decodes a transfer register word.
    ///
    /// Returns `None` if the word does not carry exactly one command bit.
    #[must_use]
    pub fn decode(word: u32) -> Option<Self> {
        let flags = XferFlags::from_bits_truncate(word)
            & (XferFlags::START | XferFlags::STOP | XferFlags::WRITE | XferFlags::READ);
        match flags {
            f if f == XferFlags::START => Some(Self::Start),
            f if f == XferFlags::STOP => Some(Self::Stop),
            f if f == XferFlags::WRITE => Some(Self::Write((word & 0xFF) as u8)),
            f if f == XferFlags::READ => Some(Self::Read {
                ack: word & XferFlags::ACK.bits() != 0,
            }),
            _ => None,
        }
    }

    /// Encodes the command into a transfer register word.
    #[must_use]
    pub const fn encode(self) -> u32 {
        match self {
            Self::Start => XferFlags::START.bits(),
            Self::Write(octet) => XferFlags::WRITE.bits() | octet as u32,
            Self::Read { ack: true } => XferFlags::READ.bits() | XferFlags::ACK.bits(),
            Self::Read { ack: false } => XferFlags::READ.bits(),
            Self::Stop => XferFlags::STOP.bits(),
        }
    }
}

/// Returns the address byte for a 7-bit I2C address.
#[must_use]
pub const fn address_byte(address: u8, read: bool) -> u8 {
    (address << 1) | read as u8
}

/// Splits an address byte into the 7-bit address and the read flag.
#[must_use]
pub const fn split_address_byte(byte: u8) -> (u8, bool) {
    (byte >> 1, byte & 0x01 != 0)
}
