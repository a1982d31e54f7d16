use clkinit_emulator::{
    sequencer::SequencerOption,
    EmulatorError, EmulatorOption, Latency,
};

use super::{assert_configured, one_mhz};

#[test]
fn stuck_bus() -> anyhow::Result<()> {
    let mut emulator = one_mhz(EmulatorOption {
        latency: Latency::Fixed(1),
        sequencer: SequencerOption {
            stall_warning: Some(1000),
        },
        ..Default::default()
    })?;
    while emulator.sequencer().pc() < 50 {
        emulator.update();
    }
    emulator.bus_mut().break_down();

    // 1000 ticks of warning on top of the 1 tick a request may legitimately take.
    (0..1000).for_each(|_| emulator.update());
    assert!(!emulator.sequencer().is_stalled());
    emulator.update();
    assert!(emulator.sequencer().is_stalled());
    let pc = emulator.sequencer().pc();

    assert_eq!(
        Err(EmulatorError::TickLimitExceeded { limit: 10_000, pc }),
        emulator.run_until_done(10_000)
    );
    assert_eq!(11_001, emulator.sequencer().stall_ticks());
    assert!(emulator.sequencer().is_stalled());

    emulator.bus_mut().repair();
    emulator.run_until_done(1_000_000)?;
    assert!(!emulator.sequencer().is_stalled());
    assert_configured(&emulator);

    Ok(())
}

#[test]
fn healthy_kc705_never_stalls() -> anyhow::Result<()> {
    let mut emulator = clkinit_emulator::ClockInitEmulator::kc705(EmulatorOption::default())?;

    // Covers the first octet, which keeps the bus busy for 18 * 156 000 ticks.
    (0..6_000_000).for_each(|_| {
        emulator.update();
        assert!(!emulator.sequencer().is_stalled());
    });
    assert!(emulator.bus().events().len() >= 3);

    Ok(())
}

#[test]
fn healthy_clock_width_run_never_stalls() -> anyhow::Result<()> {
    let mut emulator = one_mhz(EmulatorOption {
        sequencer: SequencerOption {
            stall_warning: Some(1),
        },
        ..Default::default()
    })?;

    while !emulator.is_done() {
        emulator.update();
        assert!(!emulator.sequencer().is_stalled());
    }
    assert_configured(&emulator);

    Ok(())
}
