use anyhow::Result;

use clkinit_core::prelude::*;

fn parse_mhz(arg: &str) -> Result<Freq<u32>> {
    arg.parse::<u32>()?
        .checked_mul(1_000_000)
        .map(|hz| hz * Hz)
        .ok_or_else(|| anyhow::anyhow!("{} MHz does not fit in a u32 Hz value", arg))
}

fn main() -> Result<()> {
    let freq = match std::env::args().nth(1) {
        Some(arg) => parse_mhz(&arg)?,
        None => KC705_SYS_CLK_FREQ,
    };
    let timing = ResetTiming::new(freq)?;
    let program = i2c_program(freq, &FrequencySettings::KC705_SATELLITE);

    println!("System clock: {:?}", freq);
    println!(
        "Reset hold: {} ticks, ready settle: {} ticks",
        timing.reset_hold(),
        timing.ready_settle()
    );
    program
        .iter()
        .enumerate()
        .for_each(|(i, inst)| println!("{:3}: {}", i, inst));

    Ok(())
}
