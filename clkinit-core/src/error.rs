use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
/// An error produced when validating a [`Program`].
///
/// [`Program`]: crate::program::Program
pub enum ProgramError {
    /// The program has no instruction.
    #[error("Program must not be empty")]
    Empty,
    /// The program is not terminated by [`Instruction::End`].
    ///
    /// [`Instruction::End`]: crate::program::Instruction::End
    #[error("Program must be terminated by End")]
    MissingEnd,
    /// An instruction follows [`Instruction::End`].
    ///
    /// [`Instruction::End`]: crate::program::Instruction::End
    #[error("Instruction at {0} is unreachable because it follows End")]
    InstructionAfterEnd(usize),
}

#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
/// An error produced when mapping logical Si5324 divider values to register values.
pub enum Si5324Error {
    /// N1_HS is out of range.
    #[error("N1_HS ({0}) must be in 4..=11")]
    N1HsInvalid(u8),
    /// NC1_LS is odd.
    #[error("NC1_LS ({0}) must be 0 or even")]
    Nc1LsOdd(u32),
    /// NC1_LS is too high.
    #[error("NC1_LS ({0}) must not exceed 2^20")]
    Nc1LsTooHigh(u32),
    /// N2_HS is out of range.
    #[error("N2_HS ({0}) must be in 4..=11")]
    N2HsInvalid(u8),
    /// N2_LS is odd.
    #[error("N2_LS ({0}) must be even")]
    N2LsOdd(u32),
    /// N2_LS is too high.
    #[error("N2_LS ({0}) must not exceed 2^20")]
    N2LsTooHigh(u32),
    /// N31 is too high.
    #[error("N31 ({0}) must be in 1..=2^19")]
    N31Invalid(u32),
    /// N32 is too high.
    #[error("N32 ({0}) must be in 1..=2^19")]
    N32Invalid(u32),
}

#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
/// An error produced when deriving tick counts from the system clock.
pub enum TimingError {
    /// The system clock frequency is zero.
    #[error("System clock frequency must not be zero")]
    ZeroFrequency,
}
