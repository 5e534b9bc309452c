// Licensed under the Apache-2.0 license

//! MMC5603NJ addressing and register map.

use embedded_hal::i2c::SevenBitAddress;

pub const MMC5603NJ_I2C_ADDR: SevenBitAddress = 0x30;

/// Product ID register.
pub const WHO_AM_I_REG: u8 = 0x39;

/// Value compared against [`WHO_AM_I_REG`] by default.
///
/// Board bring-up notes for this part disagree: the firmware's diagnostic
/// text says the ID should read 0x01 while the value it compares against is
/// 0x10. 0x10 is kept as the default; override
/// [`DeviceConfig::expected_identity`](super::DeviceConfig::expected_identity)
/// once the integrator has confirmed the silicon's answer.
pub const DEVICE_ID: u8 = 0x10;

/// The ID the diagnostic message claims; see [`DEVICE_ID`].
pub const DEVICE_ID_DOCUMENTED: u8 = 0x01;

pub const CTRL_REG0: u8 = 0x1A;
pub const CTRL_REG1: u8 = 0x1C;
pub const CTRL_REG2: u8 = 0x1D;

/// Carried over from the MMA8451 register map the bring-up code was derived
/// from; not an MMC5603NJ register.
pub const XYZ_DATA_CFG_REG: u8 = 0x0E;
