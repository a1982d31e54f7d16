mod freq;

use std::time::Duration;

pub use freq::*;

/// The minimum width of the Si5324 reset pulse.
pub const RESET_HOLD_TIME: Duration = Duration::from_nanos(1100);

/// The time after the reset release until the Si5324 control registers are writable.
pub const READY_SETTLE_TIME: Duration = Duration::from_millis(11);

/// The system clock frequency of the KC705 DRTIO satellite.
pub const KC705_SYS_CLK_FREQ: Freq<u32> = Freq { freq: 156_000_000 };
