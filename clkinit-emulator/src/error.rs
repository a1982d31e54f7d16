use clkinit_core::error::TimingError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
/// An error produced by the emulator.
pub enum EmulatorError {
    /// The sequencer did not finish within the given number of ticks.
    #[error("Sequencer did not finish within {limit} ticks (stuck at instruction {pc})")]
    TickLimitExceeded {
        /// The tick limit.
        limit: u64,
        /// The program counter when the limit was reached.
        pc: usize,
    },
    /// Invalid timing configuration.
    #[error("{0}")]
    Timing(#[from] TimingError),
}
