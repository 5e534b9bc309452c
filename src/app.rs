// Licensed under the Apache-2.0 license

//! Board bring-up: bus initialization, WHO_AM_I read-out and identity check.

use crate::common::{format_line, Logger};
use crate::i2c::common::{I2cConfig, I2cConfigBuilder, I2cSpeed};
use crate::i2c::system_setup::I2cSystemSetup;
use crate::i2c::traits::{I2cHardwareCore, I2cMaster};
use crate::i2c::Error;
use crate::mmc5603::registers::WHO_AM_I_REG;
use crate::mmc5603::{DeviceConfig, IdentityCheck, Mmc5603};

pub const I2C_PORT_NUM: u8 = 1;
pub const I2C_SDA_IO: u8 = 26;
pub const I2C_SCL_IO: u8 = 27;
pub const I2C_SPEED: I2cSpeed = I2cSpeed::Standard;

/// Sensor board wiring: internal pull-ups, no driver buffers in master mode.
#[must_use]
pub fn board_i2c_config() -> I2cConfig {
    I2cConfigBuilder::new()
        .port(I2C_PORT_NUM)
        .pins(I2C_SDA_IO, I2C_SCL_IO)
        .pullups(true)
        .speed(I2C_SPEED)
        .buffers(0, 0)
        .build()
}

/// Bring the bus up and probe the sensor.
///
/// The identity result is returned for the caller to act on; a mismatch is
/// only logged.
///
/// # Errors
///
/// Bus initialization and bus transfer errors.
pub fn start<B, L>(
    mut bus: B,
    mut logger: L,
) -> Result<(Mmc5603<B, L>, IdentityCheck), Error>
where
    B: I2cHardwareCore + I2cMaster,
    L: Logger,
{
    let config = board_i2c_config();
    I2cSystemSetup::initialize_i2c_system(&mut bus, &config, &mut logger)?;

    let device = DeviceConfig {
        timeout: config.timeout,
        ..DeviceConfig::default()
    };
    let mut sensor = Mmc5603::with_logger(bus, device, logger);

    let mut id = [0u8; 1];
    sensor.read_device_register(WHO_AM_I_REG, &mut id)?;
    let [who_am_i] = id;
    sensor
        .logger_mut()
        .info(&format_line(format_args!("WHO_AM_I: {who_am_i:X}")));

    let identity = sensor.verify_identity()?;
    Ok((sensor, identity))
}
