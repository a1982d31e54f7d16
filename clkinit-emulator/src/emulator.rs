use clkinit_core::{
    common::{Freq, KC705_SYS_CLK_FREQ},
    compiler::i2c_program,
    program::Program,
    si5324::{FrequencySettings, PCA9548_SI5324_CHANNEL},
    timing::ResetTiming,
};
use getset::{Getters, MutGetters};

use crate::{
    bus::{BusController, I2CMasterEmulator, Latency, Pca9548Emulator, Si5324Emulator},
    clock_switch::{ClockSwitchOption, RtioClockSwitch},
    error::EmulatorError,
    gate::ResetReadyGate,
    sequencer::{Sequencer, SequencerOption},
};

/// Option of the [`ClockInitEmulator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmulatorOption {
    /// The latency model of the I2C master. Ignored by [`ClockInitEmulator::with_bus`].
    pub latency: Latency,
    /// The sequencer option.
    pub sequencer: SequencerOption,
    /// The RTIO clock switch option.
    pub clock_switch: ClockSwitchOption,
}

/// Emulator of the whole power-up path: gate, sequencer, bus controller and RTIO clock switch.
///
/// Each [`ClockInitEmulator::update`] is one tick of the system clock. Within a tick, the gate is updated first, then the bus,
/// then the sequencer (which samples the not-ready output of the gate from the same tick), and finally the clock switch.
#[derive(Getters, MutGetters)]
pub struct ClockInitEmulator<B: BusController = I2CMasterEmulator> {
    tick: u64,
    #[getset(get = "pub")]
    gate: ResetReadyGate,
    #[getset(get = "pub")]
    sequencer: Sequencer,
    #[getset(get = "pub", get_mut = "pub")]
    bus: B,
    #[getset(get = "pub", get_mut = "pub")]
    clock_switch: RtioClockSwitch,
}

impl ClockInitEmulator<I2CMasterEmulator> {
    /// Creates an emulator with a PCA9548 switch and a Si5324 behind its channel 7.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::Timing`] if `sys_clk_freq` is zero.
    pub fn new(
        sys_clk_freq: Freq<u32>,
        settings: &FrequencySettings,
        option: EmulatorOption,
    ) -> Result<Self, EmulatorError> {
        let gate = ResetReadyGate::new(ResetTiming::new(sys_clk_freq)?);
        let bus = I2CMasterEmulator::new(option.latency)
            .attach(Pca9548Emulator::new(), None)
            .attach(
                Si5324Emulator::new(sys_clk_freq, gate.reset_line()),
                Some(PCA9548_SI5324_CHANNEL),
            );
        tracing::debug!(
            "Emulating at {:?} with {:?}, reset hold {} ticks, ready settle {} ticks",
            sys_clk_freq,
            option.latency,
            gate.timing().reset_hold(),
            gate.timing().ready_settle()
        );
        Ok(Self::with_bus(
            i2c_program(sys_clk_freq, settings),
            gate,
            bus,
            option,
        ))
    }

    /// Creates an emulator of the KC705 DRTIO satellite.
    ///
    /// # Errors
    ///
    /// See [`ClockInitEmulator::new`].
    pub fn kc705(option: EmulatorOption) -> Result<Self, EmulatorError> {
        Self::new(
            KC705_SYS_CLK_FREQ,
            &FrequencySettings::KC705_SATELLITE,
            option,
        )
    }

    /// Returns the emulated Si5324.
    #[must_use]
    pub fn si5324(&self) -> Option<&Si5324Emulator> {
        self.bus.device()
    }

    /// Returns the emulated PCA9548.
    #[must_use]
    pub fn pca9548(&self) -> Option<&Pca9548Emulator> {
        self.bus.device()
    }
}

impl<B: BusController> ClockInitEmulator<B> {
    /// Creates an emulator from its parts. Devices on `bus` that need the chip reset take it from [`ResetReadyGate::reset_line`].
    #[must_use]
    pub fn with_bus(program: Program, gate: ResetReadyGate, bus: B, option: EmulatorOption) -> Self {
        Self {
            tick: 0,
            gate,
            sequencer: Sequencer::with_option(program, option.sequencer),
            bus,
            clock_switch: RtioClockSwitch::new(option.clock_switch),
        }
    }

    /// Returns the number of ticks since power-up.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns `true` once the bus program has completed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.sequencer.is_done()
    }

    /// Advances the emulator by one tick.
    pub fn update(&mut self) {
        self.tick += 1;
        self.gate.update();
        self.bus.update();
        let not_ready = self.gate.not_ready();
        self.sequencer.update(not_ready, &mut self.bus);
        self.clock_switch.set_pll_reset(not_ready);
        self.clock_switch.update(self.sequencer.is_done());
    }

    /// Re-initializes the power-up gate. The sequencer restarts from the first instruction once the gate is ready again.
    pub fn reset(&mut self) {
        tracing::info!("Re-initializing at tick {}", self.tick);
        self.gate.reinit();
    }

    /// Ticks until the bus program completes and returns the tick at completion.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::TickLimitExceeded`] if the program does not complete within `limit` ticks.
    pub fn run_until_done(&mut self, limit: u64) -> Result<u64, EmulatorError> {
        let start = self.tick;
        while !self.sequencer.is_done() {
            if self.tick - start >= limit {
                return Err(EmulatorError::TickLimitExceeded {
                    limit,
                    pc: self.sequencer.pc(),
                });
            }
            self.update();
        }
        Ok(self.tick)
    }
}
