#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! Core types for bringing a Si5324 clock synthesizer online over I2C.
//!
//! This crate has no notion of time passing. It provides the bus register encoding,
//! the instruction [`Program`] and its compiler, the Si5324 register packing,
//! and the tick counts of the power-up gate. The tick-driven state machines live in `clkinit-emulator`.
//!
//! ```
//! use clkinit_core::prelude::*;
//!
//! let program = i2c_program(156 * MHz, &FrequencySettings::KC705_SATELLITE);
//! assert_eq!(Some(&Instruction::End), program.last());
//!
//! let timing = ResetTiming::new(156 * MHz).unwrap();
//! assert_eq!(172, timing.reset_hold());
//! assert_eq!(1_716_000, timing.ready_settle());
//! ```
//!
//! [`Program`]: crate::program::Program

/// Bus controller register encoding.
pub mod bus;
/// Common constants and types.
pub mod common;
/// Compiler from I2C transactions to a bus program.
pub mod compiler;
/// Error types.
pub mod error;
/// Bus instructions and programs.
pub mod program;
/// Si5324 divider settings and register packing.
pub mod si5324;
/// Tick counts of the power-up gate.
pub mod timing;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        bus::{BusCommand, BusStatus, XferFlags, I2C_CONFIG_ADDR, I2C_XFER_ADDR},
        common::{kHz, Freq, Hz, MHz, KC705_SYS_CLK_FREQ},
        compiler::{compile, i2c_program},
        error::{ProgramError, Si5324Error, TimingError},
        program::{Instruction, Program, ProgramBuilder},
        si5324::{FrequencySettings, LogicalSettings},
        timing::ResetTiming,
    };
}
