#![warn(missing_docs)]

//! Tick-driven emulator of the Si5324 power-up path.
//!
//! ```
//! use clkinit_emulator::{ClockInitEmulator, EmulatorOption, Latency};
//!
//! let mut emulator = ClockInitEmulator::kc705(EmulatorOption {
//!     latency: Latency::Fixed(1),
//!     ..Default::default()
//! })
//! .unwrap();
//! emulator.run_until_done(10_000_000).unwrap();
//! assert!(emulator.si5324().unwrap().calibration_started());
//! ```

/// Bus controller and I2C device emulators.
pub mod bus;
/// RTIO clock-source select and PLL status.
pub mod clock_switch;
/// The whole power-up path.
pub mod emulator;
/// Error types.
pub mod error;
/// Reset and settle timing gate.
pub mod gate;
/// Bus program sequencer.
pub mod sequencer;
/// Shared hardware signals.
pub mod signal;

pub use bus::{BusController, I2CMasterEmulator, Latency};
pub use emulator::{ClockInitEmulator, EmulatorOption};
pub use error::EmulatorError;
