// Licensed under the Apache-2.0 license

//! I2C System Setup Helper
//!
//! Sequences peripheral bring-up through [`I2cHardwareCore`]: pin, pull-up
//! and clock configuration first, then driver installation in master mode.

use crate::common::{format_line, Logger};
use crate::i2c::common::I2cConfig;
use crate::i2c::traits::I2cHardwareCore;
use crate::i2c::Error;

/// Helper for I2C bus bring-up
pub struct I2cSystemSetup;

impl I2cSystemSetup {
    /// Complete I2C bus initialization
    ///
    /// Performs, in order:
    /// - pin assignment, pull-up and clock configuration
    /// - driver installation in master mode
    ///
    /// # Arguments
    ///
    /// * `hardware` - Mutable reference to the bus transport
    /// * `config` - Bus configuration
    /// * `logger` - Receives one line describing the configured bus
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the transport; installation is not
    /// attempted when configuration fails.
    pub fn initialize_i2c_system<H, L>(
        hardware: &mut H,
        config: &I2cConfig,
        logger: &mut L,
    ) -> Result<(), Error>
    where
        H: I2cHardwareCore + ?Sized,
        L: Logger + ?Sized,
    {
        if let Err(e) = hardware.configure(config) {
            logger.error(&format_line(format_args!(
                "i2c{} configuration failed: {e}",
                config.port
            )));
            return Err(e);
        }
        Self::install_driver(hardware, logger, config.port)?;

        logger.debug(&format_line(format_args!(
            "i2c{} master: sda={} scl={} pullups={} {} Hz",
            config.port,
            config.pins.sda_io,
            config.pins.scl_io,
            config.pins.sda_pullup && config.pins.scl_pullup,
            config.speed.hz()
        )));
        Ok(())
    }

    /// Re-acquire the port without touching pin or clock configuration
    ///
    /// Useful after a transport has been released by other code.
    ///
    /// # Errors
    ///
    /// Returns the transport's installation error.
    pub fn install_driver<H, L>(hardware: &mut H, logger: &mut L, port: u8) -> Result<(), Error>
    where
        H: I2cHardwareCore + ?Sized,
        L: Logger + ?Sized,
    {
        hardware.install().inspect_err(|e| {
            logger.error(&format_line(format_args!(
                "i2c{port} driver install failed: {e}"
            )));
        })
    }
}
