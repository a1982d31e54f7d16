use derive_new::new;
use getset::CopyGetters;

use crate::{bus::address_byte, error::Si5324Error};

/// The 7-bit I2C address of the Si5324.
pub const SI5324_ADDR: u8 = 0x68;
/// The 7-bit I2C address of the PCA9548 I2C switch in front of the Si5324.
pub const PCA9548_ADDR: u8 = 0x74;
/// The PCA9548 channel the Si5324 is connected to.
pub const PCA9548_SI5324_CHANNEL: u8 = 7;

/// The number of registers written by [`FrequencySettings::registers`].
pub const NUM_CONFIG_REGISTERS: usize = 21;

const REG_CONTROL: u8 = 0;
const REG_CK_PRIOR: u8 = 1;
const REG_BWSEL: u8 = 2;
const REG_ICAL_CTRL: u8 = 3;
const REG_AUTOSEL: u8 = 4;
const REG_SFOUT: u8 = 6;
const REG_N1_HS: u8 = 25;
const REG_NC1_LS: u8 = 31;
const REG_N2: u8 = 40;
const REG_N31: u8 = 43;
const REG_N32: u8 = 46;
/// The register holding the ICAL trigger.
pub const REG_ICAL: u8 = 136;
/// The ICAL bit of [`REG_ICAL`].
pub const ICAL_BIT: u8 = 1 << 6;
const REG_FASTLOCK: u8 = 137;

const FREE_RUN: u8 = 0b0101_0000;
const CK_PRIOR: u8 = 0b1110_0100;
const BWSEL: u8 = 0b0010 | (4 << 4);
const SQ_ICAL: u8 = 0b0101 | 0x10;
const AUTOSEL_REG: u8 = 0b1001_0010;
const SFOUT1_REG: u8 = 0x07;
const FASTLOCK: u8 = 0x01;

/// Si5324 divider register values.
///
/// These are the values stored in the registers, which differ from the logical values reported by DSPLLsim.
/// Use [`LogicalSettings::map`] to convert logical values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CopyGetters, new)]
pub struct FrequencySettings {
    #[getset(get_copy = "pub")]
    /// N1_HS register value.
    n1_hs: u8,
    #[getset(get_copy = "pub")]
    /// NC1_LS register value.
    nc1_ls: u32,
    #[getset(get_copy = "pub")]
    /// N2_HS register value.
    n2_hs: u8,
    #[getset(get_copy = "pub")]
    /// N2_LS register value.
    n2_ls: u32,
    #[getset(get_copy = "pub")]
    /// N31 register value.
    n31: u32,
    #[getset(get_copy = "pub")]
    /// N32 register value.
    n32: u32,
}

impl FrequencySettings {
    /// The divider settings of the KC705 DRTIO satellite.
    pub const KC705_SATELLITE: Self = Self {
        n1_hs: 6,
        nc1_ls: 7,
        n2_hs: 6,
        n2_ls: 20111,
        n31: 2513,
        n32: 4596,
    };

    /// Packs the settings into (register, value) pairs in the order they are written.
    #[must_use]
    pub const fn registers(&self) -> [(u8, u8); NUM_CONFIG_REGISTERS] {
        const fn byte(v: u32, shift: u32) -> u8 {
            ((v >> shift) & 0xFF) as u8
        }
        [
            (REG_CONTROL, FREE_RUN),
            (REG_CK_PRIOR, CK_PRIOR),
            (REG_BWSEL, BWSEL),
            (REG_ICAL_CTRL, SQ_ICAL),
            (REG_AUTOSEL, AUTOSEL_REG),
            (REG_SFOUT, SFOUT1_REG),
            (REG_N1_HS, byte((self.n1_hs as u32) << 5, 0)),
            (REG_NC1_LS, byte(self.nc1_ls, 16)),
            (REG_NC1_LS + 1, byte(self.nc1_ls, 8)),
            (REG_NC1_LS + 2, byte(self.nc1_ls, 0)),
            (
                REG_N2,
                byte((self.n2_hs as u32) << 5, 0) | byte(self.n2_ls, 16),
            ),
            (REG_N2 + 1, byte(self.n2_ls, 8)),
            (REG_N2 + 2, byte(self.n2_ls, 0)),
            (REG_N31, byte(self.n31, 16)),
            (REG_N31 + 1, byte(self.n31, 8)),
            (REG_N31 + 2, byte(self.n31, 0)),
            (REG_N32, byte(self.n32, 16)),
            (REG_N32 + 1, byte(self.n32, 8)),
            (REG_N32 + 2, byte(self.n32, 0)),
            (REG_FASTLOCK, FASTLOCK),
            (REG_ICAL, ICAL_BIT),
        ]
    }

    /// Returns the I2C write sequence: the PCA9548 channel select, then one write per Si5324 register.
    ///
    /// Each element is the octets of one transaction, starting with the address byte.
    #[must_use]
    pub fn i2c_sequence(&self) -> Vec<Vec<u8>> {
        std::iter::once(vec![
            address_byte(PCA9548_ADDR, false),
            1 << PCA9548_SI5324_CHANNEL,
        ])
        .chain(
            self.registers()
                .into_iter()
                .map(|(reg, value)| vec![address_byte(SI5324_ADDR, false), reg, value]),
        )
        .collect()
    }
}

/// Si5324 divider values as reported by DSPLLsim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, new)]
pub struct LogicalSettings {
    /// N1_HS, in 4..=11.
    pub n1_hs: u8,
    /// NC1_LS.
    pub nc1_ls: u32,
    /// N2_HS, in 4..=11.
    pub n2_hs: u8,
    /// N2_LS.
    pub n2_ls: u32,
    /// N31.
    pub n31: u32,
    /// N32.
    pub n32: u32,
}

impl LogicalSettings {
    /// The logical divider values of the KC705 DRTIO satellite.
    pub const KC705_SATELLITE: Self = Self {
        n1_hs: 10,
        nc1_ls: 8,
        n2_hs: 10,
        n2_ls: 20112,
        n31: 2514,
        n32: 4597,
    };

    /// Maps the logical values to register values.
    ///
    /// # Errors
    ///
    /// Returns [`Si5324Error`] if any value is outside the range the chip accepts.
    pub fn map(&self) -> Result<FrequencySettings, Si5324Error> {
        if self.nc1_ls % 2 == 1 {
            return Err(Si5324Error::Nc1LsOdd(self.nc1_ls));
        }
        if self.nc1_ls > (1 << 20) {
            return Err(Si5324Error::Nc1LsTooHigh(self.nc1_ls));
        }
        if self.n2_ls % 2 == 1 {
            return Err(Si5324Error::N2LsOdd(self.n2_ls));
        }
        if self.n2_ls > (1 << 20) {
            return Err(Si5324Error::N2LsTooHigh(self.n2_ls));
        }
        if !(1..=(1 << 19)).contains(&self.n31) {
            return Err(Si5324Error::N31Invalid(self.n31));
        }
        if !(1..=(1 << 19)).contains(&self.n32) {
            return Err(Si5324Error::N32Invalid(self.n32));
        }
        Ok(FrequencySettings {
            n1_hs: Self::map_hs(self.n1_hs).ok_or(Si5324Error::N1HsInvalid(self.n1_hs))?,
            nc1_ls: self.nc1_ls.saturating_sub(1),
            n2_hs: Self::map_hs(self.n2_hs).ok_or(Si5324Error::N2HsInvalid(self.n2_hs))?,
            n2_ls: self.n2_ls.saturating_sub(1),
            n31: self.n31 - 1,
            n32: self.n32 - 1,
        })
    }

    const fn map_hs(hs: u8) -> Option<u8> {
        match hs {
            4..=11 => Some(hs - 4),
            _ => None,
        }
    }
}
