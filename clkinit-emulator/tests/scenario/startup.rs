use clkinit_emulator::{
    bus::BusEvent,
    gate::GatePhase,
    sequencer::SequencerState,
    BusController, EmulatorOption,
};

use super::{assert_configured, kc705_fixed_latency, one_mhz};

fn run_to(emulator: &mut clkinit_emulator::ClockInitEmulator, tick: u64) {
    while emulator.tick() < tick {
        emulator.update();
    }
}

#[test]
fn gate_timing_at_156mhz() -> anyhow::Result<()> {
    let mut emulator = kc705_fixed_latency(1)?;
    let rst_n = emulator.gate().reset_line();

    run_to(&mut emulator, 171);
    assert_eq!(GatePhase::ResetHold, emulator.gate().state().phase());
    assert_eq!(1, emulator.gate().state().counter());
    assert!(rst_n.is_asserted());

    run_to(&mut emulator, 172);
    assert_eq!(GatePhase::ReadySettle, emulator.gate().state().phase());
    assert_eq!(1_716_000, emulator.gate().state().counter());
    assert!(!rst_n.is_asserted());

    run_to(&mut emulator, 1_716_171);
    assert_eq!(GatePhase::ReadySettle, emulator.gate().state().phase());
    assert_eq!(1, emulator.gate().state().counter());
    assert_eq!(SequencerState::Idle, emulator.sequencer().state());
    assert!(emulator.bus().events().is_empty());

    run_to(&mut emulator, 1_716_172);
    assert_eq!(GatePhase::Ready, emulator.gate().state().phase());
    assert_eq!(SequencerState::Executing(0), emulator.sequencer().state());
    assert_eq!(156_000, emulator.bus().clock_width());

    Ok(())
}

#[test]
fn kc705_fixed_latency_end_to_end() -> anyhow::Result<()> {
    let mut emulator = kc705_fixed_latency(1)?;

    let done = emulator.run_until_done(2_000_000)?;
    assert!(done > 1_716_172);
    assert_configured(&emulator);

    let events = emulator.bus().events();
    assert_eq!(
        22,
        events.iter().filter(|e| **e == BusEvent::Start).count()
    );
    assert_eq!(22, events.iter().filter(|e| **e == BusEvent::Stop).count());
    assert!(events
        .iter()
        .all(|e| !matches!(e, BusEvent::Write { ack: false, .. })));

    assert!(!emulator.clock_switch().locked());
    (0..100).for_each(|_| emulator.update());
    assert!(emulator.clock_switch().locked());
    assert!(emulator.sequencer().is_done());

    Ok(())
}

#[test]
fn clock_width_latency_end_to_end() -> anyhow::Result<()> {
    let mut emulator = one_mhz(EmulatorOption::default())?;
    assert_eq!(2, emulator.gate().timing().reset_hold());
    assert_eq!(11_000, emulator.gate().timing().ready_settle());

    let done = emulator.run_until_done(10_000_000)?;
    assert_eq!(1000, emulator.bus().clock_width());
    // 65 octets of 18 half periods and 44 conditions of 2 half periods, 1000 ticks each.
    assert!(done > 11_002 + 65 * 18_000 + 44 * 2_000);
    assert_configured(&emulator);

    Ok(())
}
