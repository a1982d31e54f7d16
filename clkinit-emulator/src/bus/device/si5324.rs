use std::{any::Any, time::Duration};

use clkinit_core::{
    common::Freq,
    si5324::{ICAL_BIT, REG_ICAL, SI5324_ADDR},
};
use getset::CopyGetters;

use super::I2CDevice;
use crate::signal::ResetLine;

/// The minimum reset pulse width accepted by the Si5324.
pub const MIN_RESET_PULSE: Duration = Duration::from_micros(1);
/// The time after the reset release until the Si5324 responds on I2C.
pub const ACCESS_READY_TIME: Duration = Duration::from_millis(10);

const NUM_REGISTERS: usize = 256;

/// An emulated Si5324 register interface.
///
/// The first data octet of a write sets the register pointer, and the following octets are written with auto-increment.
/// The device does not acknowledge its address while it is held in reset or before [`ACCESS_READY_TIME`] has elapsed since the release.
#[derive(Debug, CopyGetters)]
pub struct Si5324Emulator {
    registers: [u8; NUM_REGISTERS],
    pointer: Option<u8>,
    rst_n: ResetLine,
    now: u64,
    in_reset: bool,
    asserted_at: u64,
    released_at: u64,
    min_reset_ticks: u64,
    ready_ticks: u64,
    #[getset(get_copy = "pub")]
    /// The number of address matches and data octets received before the device was ready.
    premature_accesses: usize,
    #[getset(get_copy = "pub")]
    /// The number of reset pulses shorter than [`MIN_RESET_PULSE`].
    short_reset_pulses: usize,
    #[getset(get_copy = "pub")]
    /// Whether ICAL has been written since the last reset.
    calibration_started: bool,
}

impl Si5324Emulator {
    /// Creates a new device clocked at `sys_clk_freq` with its reset connected to `rst_n`.
    #[must_use]
    pub fn new(sys_clk_freq: Freq<u32>, rst_n: ResetLine) -> Self {
        Self {
            registers: [0x00; NUM_REGISTERS],
            pointer: None,
            in_reset: rst_n.is_asserted(),
            rst_n,
            now: 0,
            asserted_at: 0,
            released_at: 0,
            min_reset_ticks: sys_clk_freq.ticks_ceil(MIN_RESET_PULSE),
            ready_ticks: sys_clk_freq.ticks_ceil(ACCESS_READY_TIME),
            premature_accesses: 0,
            short_reset_pulses: 0,
            calibration_started: false,
        }
    }

    /// Returns the value of register `reg`.
    #[must_use]
    pub const fn register(&self, reg: u8) -> u8 {
        self.registers[reg as usize]
    }

    /// Returns whether the device responds on I2C.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        !self.in_reset && self.now - self.released_at >= self.ready_ticks
    }

    /// Returns whether the device is held in reset.
    #[must_use]
    pub const fn in_reset(&self) -> bool {
        self.in_reset
    }

    fn clear(&mut self) {
        self.registers = [0x00; NUM_REGISTERS];
        self.pointer = None;
        self.calibration_started = false;
    }
}

impl I2CDevice for Si5324Emulator {
    fn address(&self) -> u8 {
        SI5324_ADDR
    }

    fn start(&mut self) {
        self.pointer = None;
    }

    fn address_match(&mut self, read: bool) -> bool {
        if !self.is_ready() {
            tracing::error!("Si5324 accessed before it is ready");
            self.premature_accesses += 1;
            return false;
        }
        !read
    }

    fn write(&mut self, byte: u8) -> bool {
        if !self.is_ready() {
            tracing::error!("Si5324 written before it is ready");
            self.premature_accesses += 1;
            return false;
        }
        match self.pointer {
            None => self.pointer = Some(byte),
            Some(reg) => {
                tracing::trace!("Si5324 register {} <= {:#04X}", reg, byte);
                self.registers[reg as usize] = byte;
                if reg == REG_ICAL && byte & ICAL_BIT != 0 {
                    tracing::debug!("Si5324 internal calibration started");
                    self.calibration_started = true;
                }
                self.pointer = Some(reg.wrapping_add(1));
            }
        }
        true
    }

    fn update(&mut self) {
        self.now += 1;
        match (self.in_reset, self.rst_n.is_asserted()) {
            (false, true) => {
                // The line went low some time after the previous tick.
                self.in_reset = true;
                self.asserted_at = self.now - 1;
                self.clear();
            }
            (true, false) => {
                self.in_reset = false;
                self.released_at = self.now;
                if self.now - self.asserted_at < self.min_reset_ticks {
                    tracing::error!(
                        "Si5324 reset pulse of {} ticks is shorter than {} ticks",
                        self.now - self.asserted_at,
                        self.min_reset_ticks
                    );
                    self.short_reset_pulses += 1;
                }
            }
            (true, true) => self.clear(),
            (false, false) => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
