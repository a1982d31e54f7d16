use clkinit_emulator::{gate::GatePhase, sequencer::SequencerState, EmulatorOption, Latency};
use rand::prelude::*;

use super::{assert_configured, kc705_fixed_latency, one_mhz};

#[test]
fn reset_mid_program() -> anyhow::Result<()> {
    let mut emulator = kc705_fixed_latency(1)?;
    while emulator.sequencer().pc() < 100 {
        emulator.update();
    }
    assert_ne!(0, emulator.si5324().unwrap().register(0));

    emulator.reset();
    emulator.update();
    assert_eq!(SequencerState::Idle, emulator.sequencer().state());
    assert_eq!(0, emulator.sequencer().pc());
    assert!(emulator.si5324().unwrap().in_reset());
    assert_eq!(0, emulator.si5324().unwrap().register(0));

    emulator.run_until_done(2_000_000)?;
    assert_configured(&emulator);

    Ok(())
}

#[test]
fn reset_during_settle() -> anyhow::Result<()> {
    let mut emulator = kc705_fixed_latency(1)?;
    (0..1000).for_each(|_| emulator.update());
    assert_eq!(GatePhase::ReadySettle, emulator.gate().state().phase());

    emulator.reset();
    while emulator.tick() < 1000 + 1_716_171 {
        emulator.update();
    }
    assert_eq!(SequencerState::Idle, emulator.sequencer().state());
    emulator.update();
    assert_eq!(SequencerState::Executing(0), emulator.sequencer().state());

    emulator.run_until_done(2_000_000)?;
    assert_configured(&emulator);

    Ok(())
}

#[test]
fn spurious_resets() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(0x705);
    let mut emulator = one_mhz(EmulatorOption {
        latency: Latency::Fixed(3),
        ..Default::default()
    })?;

    (0..20).for_each(|_| {
        let ticks = rng.random_range(0..12_000);
        (0..ticks).for_each(|_| emulator.update());
        emulator.reset();

        assert_eq!(GatePhase::ResetHold, emulator.gate().state().phase());
        assert!(emulator.gate().reset_line().is_asserted());
    });

    emulator.run_until_done(1_000_000)?;
    assert_configured(&emulator);

    Ok(())
}
