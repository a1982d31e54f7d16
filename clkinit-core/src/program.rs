use derive_more::{Deref, Display};

use crate::error::ProgramError;

/// A single instruction of a bus [`Program`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Writes `value` to the bus controller register at `address`.
    #[display("Write({address:#04X}, {value:#06X})")]
    Write {
        /// The register address.
        address: u8,
        /// The register word.
        value: u32,
    },
    /// Polls the bus controller register at `address` until all bits of `expected` are set.
    #[display("WaitUntil({address:#04X}, {expected:#06X})")]
    WaitUntil {
        /// The register address.
        address: u8,
        /// The bits to wait for.
        expected: u32,
    },
    /// Terminates the program.
    #[display("End")]
    End,
}

/// An ordered, immutable sequence of [`Instruction`]s terminated by [`Instruction::End`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deref)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Creates a new [`Program`] from a list of instructions.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] if the list is empty, is not terminated by [`Instruction::End`],
    /// or has an instruction after the first [`Instruction::End`].
    pub fn new(instructions: Vec<Instruction>) -> Result<Self, ProgramError> {
        let end = instructions
            .iter()
            .position(|inst| *inst == Instruction::End);
        match (instructions.len(), end) {
            (0, _) => Err(ProgramError::Empty),
            (_, None) => Err(ProgramError::MissingEnd),
            (len, Some(idx)) if idx + 1 != len => Err(ProgramError::InstructionAfterEnd(idx + 1)),
            _ => Ok(Self { instructions }),
        }
    }

    /// Returns a [`ProgramBuilder`].
    #[must_use]
    pub const fn builder() -> ProgramBuilder {
        ProgramBuilder {
            instructions: Vec::new(),
        }
    }

    /// Returns the instructions.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

/// A builder of [`Program`].
///
/// The only way to finish the builder is [`ProgramBuilder::end`], so the built program is always well-formed.
#[derive(Clone, Debug, Default)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
}

impl ProgramBuilder {
    /// Appends [`Instruction::Write`].
    #[must_use]
    pub fn write(mut self, address: u8, value: u32) -> Self {
        self.instructions.push(Instruction::Write { address, value });
        self
    }

    /// Appends [`Instruction::WaitUntil`].
    #[must_use]
    pub fn wait_until(mut self, address: u8, expected: u32) -> Self {
        self.instructions
            .push(Instruction::WaitUntil { address, expected });
        self
    }

    /// Appends [`Instruction::End`] and returns the [`Program`].
    #[must_use]
    pub fn end(mut self) -> Program {
        self.instructions.push(Instruction::End);
        Program {
            instructions: self.instructions,
        }
    }
}
