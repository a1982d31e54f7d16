use derive_more::Display;
use getset::CopyGetters;

/// Source of the RTIO clock.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum ClockSource {
    /// The on-board oscillator. Always valid.
    Internal,
    /// The clock synthesizer output. Valid only after the synthesizer has been programmed.
    #[default]
    External,
}

/// Option of the [`RtioClockSwitch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockSwitchOption {
    /// The initially selected source. The default is [`ClockSource::External`].
    pub source: ClockSource,
    /// The number of consecutive ticks with a valid source before the PLL reports lock. The default is 100.
    pub lock_ticks: u32,
}

impl Default for ClockSwitchOption {
    fn default() -> Self {
        Self {
            source: ClockSource::default(),
            lock_ticks: 100,
        }
    }
}

/// RTIO clock-source select with PLL reset and lock status.
#[derive(Debug, CopyGetters)]
pub struct RtioClockSwitch {
    #[getset(get_copy = "pub")]
    /// The selected source.
    source: ClockSource,
    #[getset(get_copy = "pub")]
    /// Whether the PLL is held in reset.
    pll_reset: bool,
    #[getset(get_copy = "pub")]
    /// Whether the PLL is locked.
    locked: bool,
    valid_ticks: u32,
    lock_ticks: u32,
}

impl RtioClockSwitch {
    /// Creates a new switch with the PLL held in reset.
    #[must_use]
    pub const fn new(option: ClockSwitchOption) -> Self {
        Self {
            source: option.source,
            pll_reset: true,
            locked: false,
            valid_ticks: 0,
            lock_ticks: option.lock_ticks,
        }
    }

    /// Selects the clock source. Changing the source unlocks the PLL.
    pub fn select(&mut self, source: ClockSource) {
        if self.source != source {
            tracing::debug!("RTIO clock source: {} -> {}", self.source, source);
            self.source = source;
            self.unlock();
        }
    }

    /// Asserts or releases the PLL reset.
    pub fn set_pll_reset(&mut self, reset: bool) {
        self.pll_reset = reset;
    }

    fn unlock(&mut self) {
        if self.locked {
            tracing::warn!("RTIO PLL lost lock");
        }
        self.locked = false;
        self.valid_ticks = 0;
    }

    /// Advances the switch by one tick. `external_valid` tells whether the synthesizer output is usable.
    pub fn update(&mut self, external_valid: bool) {
        let valid = !self.pll_reset
            && match self.source {
                ClockSource::Internal => true,
                ClockSource::External => external_valid,
            };
        if !valid {
            self.unlock();
            return;
        }
        if self.locked {
            return;
        }
        self.valid_ticks += 1;
        if self.valid_ticks >= self.lock_ticks {
            tracing::info!("RTIO PLL locked to {} clock", self.source);
            self.locked = true;
        }
    }
}
