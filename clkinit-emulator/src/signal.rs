use std::{cell::Cell, rc::Rc};

/// An active-low reset line shared between its driver and its receivers.
///
/// Cloning the line yields another handle to the same wire.
#[derive(Clone, Debug)]
pub struct ResetLine {
    asserted: Rc<Cell<bool>>,
}

impl ResetLine {
    /// Creates a new line, asserted as at power-up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            asserted: Rc::new(Cell::new(true)),
        }
    }

    /// Drives the line low.
    pub fn assert(&self) {
        self.asserted.set(true);
    }

    /// Releases the line.
    pub fn release(&self) {
        self.asserted.set(false);
    }

    /// Returns `true` while the reset is asserted.
    #[must_use]
    pub fn is_asserted(&self) -> bool {
        self.asserted.get()
    }
}

impl Default for ResetLine {
    fn default() -> Self {
        Self::new()
    }
}
