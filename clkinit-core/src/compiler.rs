use crate::{
    bus::{XferFlags, I2C_CONFIG_ADDR, I2C_XFER_ADDR},
    common::Freq,
    program::{Program, ProgramBuilder},
    si5324::FrequencySettings,
};

fn wait_idle(builder: ProgramBuilder) -> ProgramBuilder {
    builder.wait_until(I2C_XFER_ADDR, XferFlags::IDLE.bits())
}

/// Compiles I2C write transactions into a bus [`Program`].
///
/// The program first writes the clock width (`sys_clk_freq` in kHz) to the bus controller configuration register.
/// Then, for each transaction, it issues START, every octet, and STOP, each followed by a wait for the bus to become idle.
#[must_use]
pub fn compile<I, S>(sys_clk_freq: Freq<u32>, sequence: I) -> Program
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    sequence
        .into_iter()
        .fold(
            Program::builder().write(I2C_CONFIG_ADDR, sys_clk_freq.khz()),
            |builder, transaction| {
                let builder = wait_idle(builder.write(I2C_XFER_ADDR, XferFlags::START.bits()));
                let builder = transaction.as_ref().iter().fold(builder, |builder, &octet| {
                    wait_idle(builder.write(I2C_XFER_ADDR, XferFlags::WRITE.bits() | octet as u32))
                });
                wait_idle(builder.write(I2C_XFER_ADDR, XferFlags::STOP.bits()))
            },
        )
        .end()
}

/// Compiles the Si5324 configuration program for `settings`.
#[must_use]
pub fn i2c_program(sys_clk_freq: Freq<u32>, settings: &FrequencySettings) -> Program {
    compile(sys_clk_freq, settings.i2c_sequence())
}
