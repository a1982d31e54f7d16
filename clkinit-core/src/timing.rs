use getset::CopyGetters;

use crate::{
    common::{Freq, READY_SETTLE_TIME, RESET_HOLD_TIME},
    error::TimingError,
};

/// Tick counts of the Si5324 power-up gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CopyGetters)]
pub struct ResetTiming {
    #[getset(get_copy = "pub")]
    /// Ticks the reset line is held asserted.
    reset_hold: u32,
    #[getset(get_copy = "pub")]
    /// Ticks after the reset release until the chip may be accessed.
    ready_settle: u32,
}

impl ResetTiming {
    /// Derives the tick counts from the system clock frequency, rounding up.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::ZeroFrequency`] if `sys_clk_freq` is zero.
    pub const fn new(sys_clk_freq: Freq<u32>) -> Result<Self, TimingError> {
        if sys_clk_freq.hz() == 0 {
            return Err(TimingError::ZeroFrequency);
        }
        // Both products stay below u32::MAX for any u32 frequency.
        Ok(Self {
            reset_hold: sys_clk_freq.ticks_ceil(RESET_HOLD_TIME) as u32,
            ready_settle: sys_clk_freq.ticks_ceil(READY_SETTLE_TIME) as u32,
        })
    }

    /// Creates tick counts directly.
    #[must_use]
    pub const fn from_ticks(reset_hold: u32, ready_settle: u32) -> Self {
        Self {
            reset_hold,
            ready_settle,
        }
    }

    /// Total ticks from power-up until the chip may be accessed.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.reset_hold as u64 + self.ready_settle as u64
    }
}
