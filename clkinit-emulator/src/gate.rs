use clkinit_core::timing::ResetTiming;
use derive_more::Display;
use getset::CopyGetters;

use crate::signal::ResetLine;

/// Phase of the [`ResetReadyGate`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum GatePhase {
    /// The chip reset is asserted.
    ResetHold,
    /// The chip reset is released, but the chip is not accessible yet.
    ReadySettle,
    /// The chip is accessible.
    Ready,
}

/// Snapshot of the [`ResetReadyGate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct GateState {
    /// The current phase.
    phase: GatePhase,
    /// The remaining ticks of the current phase. Always zero in [`GatePhase::Ready`].
    counter: u32,
}

/// Two chained down-counters that hold the chip in reset and then wait until it settles.
///
/// The gate drives the active-low chip reset and reports [`ResetReadyGate::not_ready`] until both phases have elapsed.
#[derive(Debug)]
pub struct ResetReadyGate {
    timing: ResetTiming,
    state: GateState,
    rst_n: ResetLine,
}

impl ResetReadyGate {
    /// Creates a new gate at power-up.
    #[must_use]
    pub fn new(timing: ResetTiming) -> Self {
        Self {
            timing,
            state: GateState {
                phase: GatePhase::ResetHold,
                counter: timing.reset_hold(),
            },
            rst_n: ResetLine::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Returns the tick counts.
    #[must_use]
    pub const fn timing(&self) -> ResetTiming {
        self.timing
    }

    /// Returns a handle to the chip reset line driven by this gate.
    #[must_use]
    pub fn reset_line(&self) -> ResetLine {
        self.rst_n.clone()
    }

    /// Returns `true` until the gate reaches [`GatePhase::Ready`].
    #[must_use]
    pub fn not_ready(&self) -> bool {
        self.state.phase != GatePhase::Ready
    }

    /// Returns to [`GatePhase::ResetHold`] with both durations reloaded and asserts the chip reset.
    pub fn reinit(&mut self) {
        tracing::debug!("Gate re-initialized in {}", self.state.phase);
        self.rst_n.assert();
        self.state = GateState {
            phase: GatePhase::ResetHold,
            counter: self.timing.reset_hold(),
        };
    }

    /// Advances the gate by one tick.
    pub fn update(&mut self) {
        if self.state.phase == GatePhase::Ready {
            return;
        }
        self.state.counter = self.state.counter.saturating_sub(1);
        if self.state.counter > 0 {
            return;
        }
        self.state = match self.state.phase {
            GatePhase::ResetHold => {
                tracing::debug!("Chip reset released");
                self.rst_n.release();
                GateState {
                    phase: GatePhase::ReadySettle,
                    counter: self.timing.ready_settle(),
                }
            }
            _ => {
                tracing::info!("Clock chip is ready");
                GateState {
                    phase: GatePhase::Ready,
                    counter: 0,
                }
            }
        };
    }
}
