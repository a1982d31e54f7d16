mod restart;
mod stall;
mod startup;

use clkinit_core::common::MHz;
use clkinit_emulator::{ClockInitEmulator, EmulatorOption, Latency};

pub fn kc705_fixed_latency(latency: u32) -> anyhow::Result<ClockInitEmulator> {
    Ok(ClockInitEmulator::kc705(EmulatorOption {
        latency: Latency::Fixed(latency),
        ..Default::default()
    })?)
}

pub fn one_mhz(option: EmulatorOption) -> anyhow::Result<ClockInitEmulator> {
    Ok(ClockInitEmulator::new(
        1 * MHz,
        &clkinit_core::si5324::FrequencySettings::KC705_SATELLITE,
        option,
    )?)
}

pub fn assert_configured(emulator: &ClockInitEmulator) {
    let si5324 = emulator.si5324().unwrap();
    clkinit_core::si5324::FrequencySettings::KC705_SATELLITE
        .registers()
        .into_iter()
        .for_each(|(reg, value)| assert_eq!(value, si5324.register(reg), "register {reg}"));
    assert!(si5324.calibration_started());
    assert_eq!(0, si5324.premature_accesses());
    assert_eq!(0, si5324.short_reset_pulses());
    assert_eq!(0, emulator.bus().overlapped_requests());
    assert!(emulator.pca9548().unwrap().is_enabled(7));
}
