use anyhow::Result;

use clkinit_core::prelude::*;
use clkinit_emulator::{ClockInitEmulator, EmulatorOption, Latency};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let settings = LogicalSettings::KC705_SATELLITE.map()?;
    let mut emulator = ClockInitEmulator::new(
        KC705_SYS_CLK_FREQ,
        &settings,
        EmulatorOption {
            latency: Latency::Fixed(4),
            ..Default::default()
        },
    )?;

    let done = emulator.run_until_done(10_000_000)?;
    tracing::info!(
        "Si5324 configured at tick {} ({:.1} us)",
        done,
        done as f64 / KC705_SYS_CLK_FREQ.hz() as f64 * 1e6
    );

    while !emulator.clock_switch().locked() {
        emulator.update();
    }
    tracing::info!("RTIO clock locked at tick {}", emulator.tick());

    if let Some(si5324) = emulator.si5324() {
        settings.registers().into_iter().for_each(|(reg, _)| {
            tracing::info!("Si5324 register {:3}: {:#04X}", reg, si5324.register(reg));
        });
        tracing::info!(
            "Premature accesses: {}, short reset pulses: {}",
            si5324.premature_accesses(),
            si5324.short_reset_pulses()
        );
    }

    Ok(())
}
