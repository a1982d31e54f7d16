use clkinit_core::{
    bus::BusStatus,
    program::{Instruction, Program},
};
use derive_more::Display;

use crate::bus::BusController;

/// State of the [`Sequencer`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum SequencerState {
    /// Held in reset; the next tick starts at instruction 0.
    Idle,
    /// Executing the instruction at the given index.
    #[display("Executing({_0})")]
    Executing(usize),
    /// The program has reached [`Instruction::End`].
    Halted,
}

/// Option of the [`Sequencer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencerOption {
    /// The number of consecutive ticks without progress, beyond [`BusController::max_request_ticks`],
    /// after which the sequencer is reported as stalled.
    /// The default is 1,000,000 ticks. If `None`, stalls are never reported.
    pub stall_warning: Option<u64>,
}

impl Default for SequencerOption {
    fn default() -> Self {
        Self {
            stall_warning: Some(1_000_000),
        }
    }
}

/// Executes a [`Program`] against a [`BusController`], one instruction per completed bus request.
///
/// There is no timeout on [`Instruction::WaitUntil`] or on a bus that stays busy; a sequencer that makes no progress keeps waiting
/// and is observable through [`Sequencer::stall_ticks`] and [`Sequencer::is_stalled`].
#[derive(Debug)]
pub struct Sequencer {
    program: Program,
    state: SequencerState,
    issued: bool,
    stall_ticks: u64,
    stall_limit: Option<u64>,
    stall_reported: bool,
    option: SequencerOption,
}

impl Sequencer {
    /// Creates a new sequencer with the default option.
    #[must_use]
    pub fn new(program: Program) -> Self {
        Self::with_option(program, SequencerOption::default())
    }

    /// Creates a new sequencer.
    #[must_use]
    pub fn with_option(program: Program, option: SequencerOption) -> Self {
        Self {
            program,
            state: SequencerState::Idle,
            issued: false,
            stall_ticks: 0,
            stall_limit: option.stall_warning,
            stall_reported: false,
            option,
        }
    }

    /// Returns the program.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> SequencerState {
        self.state
    }

    /// Returns the index of the current instruction.
    #[must_use]
    pub fn pc(&self) -> usize {
        match self.state {
            SequencerState::Idle => 0,
            SequencerState::Executing(pc) => pc,
            SequencerState::Halted => self.program.len() - 1,
        }
    }

    /// Returns `true` once the program has reached [`Instruction::End`].
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == SequencerState::Halted
    }

    /// Returns the number of consecutive ticks without progress.
    #[must_use]
    pub const fn stall_ticks(&self) -> u64 {
        self.stall_ticks
    }

    /// Returns `true` if [`Sequencer::stall_ticks`] has reached [`SequencerOption::stall_warning`]
    /// plus the longest healthy request of the bus.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.stall_limit.is_some_and(|limit| self.stall_ticks >= limit)
    }

    /// Advances the sequencer by one tick.
    ///
    /// While `reset` is asserted, the sequencer returns to [`SequencerState::Idle`] and forgets any issued request.
    pub fn update<B: BusController + ?Sized>(&mut self, reset: bool, bus: &mut B) {
        if reset {
            if self.state != SequencerState::Idle {
                tracing::debug!("Sequencer reset in {}", self.state);
            }
            self.state = SequencerState::Idle;
            self.issued = false;
            self.stall_ticks = 0;
            self.stall_reported = false;
            return;
        }

        let pc = match self.state {
            SequencerState::Halted => return,
            SequencerState::Idle => 0,
            SequencerState::Executing(pc) => pc,
        };
        self.state = SequencerState::Executing(pc);

        let progressed = match self.program[pc] {
            Instruction::Write { address, value } => match (bus.status(), self.issued) {
                (BusStatus::Busy, _) => false,
                (BusStatus::Idle, true) => {
                    self.issued = false;
                    self.state = SequencerState::Executing(pc + 1);
                    true
                }
                (BusStatus::Idle, false) => {
                    tracing::trace!("[{}] {}", pc, self.program[pc]);
                    bus.write_register(address, value);
                    self.issued = true;
                    true
                }
            },
            Instruction::WaitUntil { address, expected } => {
                if bus.read_register(address) & expected == expected {
                    self.state = SequencerState::Executing(pc + 1);
                    true
                } else {
                    false
                }
            }
            Instruction::End => {
                tracing::info!("Bus program complete");
                self.state = SequencerState::Halted;
                true
            }
        };

        if progressed {
            self.stall_ticks = 0;
            self.stall_reported = false;
            return;
        }
        self.stall_ticks += 1;
        self.stall_limit = self
            .option
            .stall_warning
            .map(|warning| warning.saturating_add(bus.max_request_ticks()));
        if !self.stall_reported && self.is_stalled() {
            tracing::warn!(
                "Sequencer has made no progress at instruction {} ({}) for {} ticks",
                pc,
                self.program[pc],
                self.stall_ticks
            );
            self.stall_reported = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use clkinit_core::bus::{BusCommand, XferFlags, I2C_CONFIG_ADDR, I2C_XFER_ADDR};
    use rand::prelude::*;

    use super::*;
    use crate::bus::{tests::RecordingBus, I2CMasterEmulator, Latency};

    const START: u32 = XferFlags::START.bits();
    const STOP: u32 = XferFlags::STOP.bits();
    const IDLE: u32 = XferFlags::IDLE.bits();

    fn five_instructions() -> Program {
        Program::builder()
            .write(I2C_XFER_ADDR, START)
            .write(I2C_XFER_ADDR, XferFlags::WRITE.bits() | 0xD0)
            .wait_until(I2C_XFER_ADDR, IDLE)
            .write(I2C_XFER_ADDR, STOP)
            .end()
    }

    fn tick<B: BusController>(seq: &mut Sequencer, reset: bool, bus: &mut B) {
        bus.update();
        seq.update(reset, bus);
    }

    /// A bus that stays busy for a random number of ticks after each request.
    struct RandomLatencyBus {
        rng: StdRng,
        remaining: u32,
        requests: usize,
        violations: usize,
    }

    impl RandomLatencyBus {
        fn new(seed: u64) -> Self {
            Self {
                rng: StdRng::seed_from_u64(seed),
                remaining: 0,
                requests: 0,
                violations: 0,
            }
        }

        fn request(&mut self) {
            if self.remaining > 0 {
                self.violations += 1;
            }
            self.requests += 1;
            self.remaining = self.rng.random_range(0..5);
        }
    }

    impl BusController for RandomLatencyBus {
        fn status(&self) -> BusStatus {
            if self.remaining > 0 {
                BusStatus::Busy
            } else {
                BusStatus::Idle
            }
        }

        fn acked(&self) -> bool {
            true
        }

        fn clock_width(&self) -> u32 {
            0
        }

        fn configure(&mut self, _: u32) {}

        fn start(&mut self) {
            self.request();
        }

        fn write_byte(&mut self, _: u8) {
            self.request();
        }

        fn stop(&mut self) {
            self.request();
        }

        fn update(&mut self) {
            self.remaining = self.remaining.saturating_sub(1);
        }
    }

    #[test]
    fn five_instruction_scenario() {
        let mut seq = Sequencer::new(five_instructions());
        let mut bus = I2CMasterEmulator::new(Latency::Fixed(1));

        let expect = [
            SequencerState::Executing(0),
            SequencerState::Executing(1),
            SequencerState::Executing(1),
            SequencerState::Executing(2),
            SequencerState::Executing(3),
            SequencerState::Executing(3),
            SequencerState::Executing(4),
            SequencerState::Halted,
        ];
        expect.into_iter().for_each(|state| {
            tick(&mut seq, false, &mut bus);
            assert_eq!(state, seq.state());
        });
        assert_eq!(4, seq.pc());
        assert!(seq.is_done());

        (0..100).for_each(|_| tick(&mut seq, false, &mut bus));
        assert_eq!(SequencerState::Halted, seq.state());
        assert_eq!(3, bus.events().len());
        assert_eq!(0, bus.overlapped_requests());

        tick(&mut seq, true, &mut bus);
        assert_eq!(SequencerState::Idle, seq.state());
        assert_eq!(0, seq.pc());
        assert!(!seq.is_done());
    }

    #[test]
    fn idle_while_reset() {
        let mut seq = Sequencer::new(five_instructions());
        let mut bus = RecordingBus::default();

        (0..10).for_each(|_| tick(&mut seq, true, &mut bus));
        assert_eq!(SequencerState::Idle, seq.state());
        assert!(bus.requests.is_empty());

        tick(&mut seq, false, &mut bus);
        assert_eq!(SequencerState::Executing(0), seq.state());
        assert_eq!(vec![BusCommand::Start], bus.requests);
    }

    #[test]
    fn configure_write() {
        let mut seq = Sequencer::new(
            Program::builder()
                .write(I2C_CONFIG_ADDR, 156_000)
                .wait_until(I2C_CONFIG_ADDR, 156_000)
                .end(),
        );
        let mut bus = RecordingBus::default();

        tick(&mut seq, false, &mut bus);
        assert_eq!(156_000, bus.clock_width);
        (0..3).for_each(|_| tick(&mut seq, false, &mut bus));
        assert!(seq.is_done());
    }

    #[test]
    fn hold_while_busy() {
        let mut seq = Sequencer::new(five_instructions());
        let mut bus = RecordingBus {
            busy: true,
            ..Default::default()
        };

        (0..10).for_each(|_| tick(&mut seq, false, &mut bus));
        assert_eq!(SequencerState::Executing(0), seq.state());
        assert!(bus.requests.is_empty());
        assert_eq!(10, seq.stall_ticks());

        bus.busy = false;
        tick(&mut seq, false, &mut bus);
        assert_eq!(vec![BusCommand::Start], bus.requests);
        assert_eq!(0, seq.stall_ticks());
    }

    #[test]
    fn restart_while_request_in_flight() {
        let mut seq = Sequencer::new(five_instructions());
        let mut bus = I2CMasterEmulator::new(Latency::Fixed(5));

        tick(&mut seq, false, &mut bus);
        tick(&mut seq, true, &mut bus);
        while !seq.is_done() {
            tick(&mut seq, false, &mut bus);
        }

        assert_eq!(0, bus.overlapped_requests());
        assert_eq!(4, bus.events().len());
    }

    #[rstest::rstest]
    #[case(Some(10), 10, true)]
    #[case(Some(10), 9, false)]
    #[case(None, 10_000, false)]
    fn stall(#[case] stall_warning: Option<u64>, #[case] ticks: usize, #[case] expect: bool) {
        let mut seq = Sequencer::with_option(
            Program::builder().wait_until(I2C_XFER_ADDR, IDLE).end(),
            SequencerOption { stall_warning },
        );
        let mut bus = RecordingBus {
            busy: true,
            ..Default::default()
        };

        (0..ticks).for_each(|_| tick(&mut seq, false, &mut bus));
        assert_eq!(ticks as u64, seq.stall_ticks());
        assert_eq!(expect, seq.is_stalled());
        assert_eq!(0, seq.pc());

        bus.busy = false;
        tick(&mut seq, false, &mut bus);
        assert_eq!(1, seq.pc());
        assert!(!seq.is_stalled());
    }

    #[test]
    fn stall_beyond_request_latency() {
        let mut seq = Sequencer::with_option(
            five_instructions(),
            SequencerOption {
                stall_warning: Some(10),
            },
        );
        let mut bus = RecordingBus {
            max_request_ticks: 50,
            ..Default::default()
        };

        tick(&mut seq, false, &mut bus);
        assert_eq!(vec![BusCommand::Start], bus.requests);

        bus.busy = true;
        (0..59).for_each(|_| tick(&mut seq, false, &mut bus));
        assert_eq!(59, seq.stall_ticks());
        assert!(!seq.is_stalled());

        tick(&mut seq, false, &mut bus);
        assert!(seq.is_stalled());
    }

    #[test]
    fn default_option() {
        assert_eq!(Some(1_000_000), SequencerOption::default().stall_warning);
    }

    #[rstest::rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn random_latency_and_resets(#[case] seed: u64) {
        let program = Program::builder()
            .write(I2C_XFER_ADDR, START)
            .write(I2C_XFER_ADDR, XferFlags::WRITE.bits() | 0xE8)
            .wait_until(I2C_XFER_ADDR, IDLE)
            .write(I2C_XFER_ADDR, XferFlags::WRITE.bits() | 0x80)
            .wait_until(I2C_XFER_ADDR, IDLE)
            .write(I2C_XFER_ADDR, STOP)
            .end();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut seq = Sequencer::new(program);
        let mut bus = RandomLatencyBus::new(seed);

        let mut prev_pc = 0;
        (0..10_000).for_each(|_| {
            let reset = rng.random_bool(0.01);
            tick(&mut seq, reset, &mut bus);
            if reset {
                assert_eq!(0, seq.pc());
            } else {
                assert!(prev_pc <= seq.pc());
            }
            prev_pc = seq.pc();
        });

        assert!(bus.requests > 0);
        assert_eq!(0, bus.violations);
    }
}
