// Licensed under the Apache-2.0 license

use crate::common::{format_line, Logger, NoOpLogger};
use crate::i2c::common::DEFAULT_TIMEOUT;
use crate::i2c::register::{read_register, write_register};
use crate::i2c::traits::I2cMaster;
use crate::i2c::Error;
use crate::mmc5603::registers::{DEVICE_ID, MMC5603NJ_I2C_ADDR, WHO_AM_I_REG};
use embedded_hal::i2c::SevenBitAddress;
use fugit::MillisDurationU32;

/// Addressing and identity constants for one sensor instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    pub address: SevenBitAddress,
    pub identity_register: u8,
    pub expected_identity: u8,
    /// Bound on each register transfer.
    pub timeout: MillisDurationU32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: MMC5603NJ_I2C_ADDR,
            identity_register: WHO_AM_I_REG,
            expected_identity: DEVICE_ID,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Outcome of [`Mmc5603::verify_identity`]. A mismatch is a diagnostic, not a
/// bus failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IdentityCheck {
    Match(u8),
    Mismatch { actual: u8, expected: u8 },
}

impl IdentityCheck {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, IdentityCheck::Match(_))
    }
}

/// MMC5603NJ magnetometer on an I2C bus.
///
/// Owns its bus handle; pass `&mut bus` to keep ownership with the caller.
pub struct Mmc5603<B: I2cMaster, L: Logger = NoOpLogger> {
    bus: B,
    config: DeviceConfig,
    logger: L,
}

impl<B: I2cMaster> Mmc5603<B, NoOpLogger> {
    pub fn new(bus: B, config: DeviceConfig) -> Self {
        Self::with_logger(bus, config, NoOpLogger)
    }
}

impl<B: I2cMaster, L: Logger> Mmc5603<B, L> {
    pub fn with_logger(bus: B, config: DeviceConfig, logger: L) -> Self {
        Self {
            bus,
            config,
            logger,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    /// Hand the bus back.
    pub fn release(self) -> B {
        self.bus
    }

    /// Read `buffer.len()` consecutive registers starting at `register`.
    ///
    /// # Errors
    ///
    /// Bus errors are returned unchanged.
    pub fn read_device_register(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Error> {
        read_register(
            &mut self.bus,
            self.config.address,
            register,
            buffer,
            self.config.timeout,
        )
    }

    /// Write `data` to consecutive registers starting at `register`.
    ///
    /// # Errors
    ///
    /// Bus errors are returned unchanged.
    pub fn write_device_register(&mut self, register: u8, data: &[u8]) -> Result<(), Error> {
        write_register(
            &mut self.bus,
            self.config.address,
            register,
            data,
            self.config.timeout,
        )
    }

    /// Read the identity register and compare it with the configured value.
    ///
    /// The result is logged either way. A mismatch does not stop the driver
    /// from being used.
    ///
    /// # Errors
    ///
    /// Only bus errors; a wrong ID is reported through [`IdentityCheck`].
    pub fn verify_identity(&mut self) -> Result<IdentityCheck, Error> {
        let mut id = [0u8; 1];
        self.read_device_register(self.config.identity_register, &mut id)?;
        let [actual] = id;
        let expected = self.config.expected_identity;

        if actual == expected {
            self.logger
                .info(&format_line(format_args!("MMC5603 ID:0x{actual:02X} (ok)")));
            Ok(IdentityCheck::Match(actual))
        } else {
            self.logger.error(&format_line(format_args!(
                "MMC5603 ID:0x{actual:02X} not correct, expected 0x{expected:02X}"
            )));
            Ok(IdentityCheck::Mismatch { actual, expected })
        }
    }
}

/// Swap the two bytes of a 16-bit value.
///
/// Used to bring register pairs read in device byte order into host order.
#[must_use]
pub const fn byte_swap(data: u16) -> u16 {
    data.rotate_left(8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::sim::{BusEvent, SimulatedBus, SimulatedDevice};
    use crate::mmc5603::registers::{CTRL_REG0, DEVICE_ID_DOCUMENTED};
    use std::string::String;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingLogger {
        info: Vec<String>,
        error: Vec<String>,
    }

    impl Logger for RecordingLogger {
        fn debug(&mut self, _msg: &str) {}
        fn info(&mut self, msg: &str) {
            self.info.push(msg.into());
        }
        fn error(&mut self, msg: &str) {
            self.error.push(msg.into());
        }
    }

    fn sensor_bus(id: u8) -> SimulatedBus {
        let mut device = SimulatedDevice::new(MMC5603NJ_I2C_ADDR);
        device.set_register(WHO_AM_I_REG, id);
        let mut bus = SimulatedBus::new();
        bus.attach(device).unwrap();
        bus
    }

    #[test]
    fn test_read_identity_register() {
        let mut sensor = Mmc5603::new(sensor_bus(0x10), DeviceConfig::default());
        let mut buf = [0u8; 1];
        sensor.read_device_register(WHO_AM_I_REG, &mut buf).unwrap();
        assert_eq!(buf, [0x10]);
    }

    #[test]
    fn test_verify_identity_match_logs_info() {
        let mut sensor = Mmc5603::with_logger(
            sensor_bus(0x10),
            DeviceConfig::default(),
            RecordingLogger::default(),
        );
        assert_eq!(sensor.verify_identity(), Ok(IdentityCheck::Match(0x10)));
        assert_eq!(sensor.logger_mut().info, ["MMC5603 ID:0x10 (ok)"]);
        assert!(sensor.logger_mut().error.is_empty());
    }

    #[test]
    fn test_identity_mismatch_is_soft() {
        let mut sensor = Mmc5603::with_logger(
            sensor_bus(0x20),
            DeviceConfig::default(),
            RecordingLogger::default(),
        );

        let mut buf = [0u8; 1];
        sensor.read_device_register(WHO_AM_I_REG, &mut buf).unwrap();
        assert_eq!(buf, [0x20]);

        let check = sensor.verify_identity().unwrap();
        assert_eq!(
            check,
            IdentityCheck::Mismatch {
                actual: 0x20,
                expected: 0x10
            }
        );
        assert!(!check.is_match());
        assert_eq!(
            sensor.logger_mut().error,
            ["MMC5603 ID:0x20 not correct, expected 0x10"]
        );

        // still usable afterwards
        sensor.write_device_register(CTRL_REG0, &[0x01]).unwrap();
    }

    #[test]
    fn test_verify_identity_propagates_bus_error() {
        let mut sensor = Mmc5603::with_logger(
            SimulatedBus::new(),
            DeviceConfig::default(),
            RecordingLogger::default(),
        );
        assert_eq!(sensor.verify_identity(), Err(Error::AddressNack));
        assert!(sensor.logger_mut().info.is_empty());
        assert!(sensor.logger_mut().error.is_empty());
    }

    #[test]
    fn test_address_nack_propagates_and_leaves_buffer() {
        let mut bus = sensor_bus(0x10);
        bus.device_mut(MMC5603NJ_I2C_ADDR).unwrap().nack_address();
        let mut sensor = Mmc5603::new(&mut bus, DeviceConfig::default());

        let mut buf = [0xA5u8; 1];
        assert_eq!(
            sensor.read_device_register(WHO_AM_I_REG, &mut buf),
            Err(Error::AddressNack)
        );
        assert_eq!(buf, [0xA5]);
        assert_eq!(bus.trace().last(), Some(&BusEvent::Stop));
    }

    #[test]
    fn test_write_control_register() {
        let mut bus = sensor_bus(0x10);
        Mmc5603::new(&mut bus, DeviceConfig::default())
            .write_device_register(CTRL_REG0, &[0x01])
            .unwrap();
        assert_eq!(bus.device(MMC5603NJ_I2C_ADDR).unwrap().register(CTRL_REG0), 0x01);
    }

    #[test]
    fn test_data_nack_propagates_unchanged() {
        let mut bus = sensor_bus(0x10);
        bus.device_mut(MMC5603NJ_I2C_ADDR).unwrap().nack_data_byte(1);
        let mut sensor = Mmc5603::new(bus, DeviceConfig::default());
        assert_eq!(
            sensor.write_device_register(CTRL_REG0, &[0x01]),
            Err(Error::DataNack)
        );
    }

    #[test]
    fn test_configured_instances_coexist() {
        let mut bus = sensor_bus(0x10);
        let mut second = SimulatedDevice::new(0x31);
        second.set_register(WHO_AM_I_REG, DEVICE_ID_DOCUMENTED);
        bus.attach(second).unwrap();

        let alt = DeviceConfig {
            address: 0x31,
            expected_identity: DEVICE_ID_DOCUMENTED,
            ..DeviceConfig::default()
        };

        let first = Mmc5603::new(&mut bus, DeviceConfig::default())
            .verify_identity()
            .unwrap();
        let other = Mmc5603::new(&mut bus, alt).verify_identity().unwrap();

        assert_eq!(first, IdentityCheck::Match(0x10));
        assert_eq!(other, IdentityCheck::Match(0x01));
    }

    #[test]
    fn test_release_returns_bus() {
        let sensor = Mmc5603::new(sensor_bus(0x10), DeviceConfig::default());
        assert_eq!(sensor.config().address, 0x30);
        let bus = sensor.release();
        assert_eq!(bus.transaction_count(), 0);
    }

    #[test]
    fn test_byte_swap() {
        assert_eq!(byte_swap(0x1234), 0x3412);
        assert_eq!(byte_swap(0x00FF), 0xFF00);
        for v in (0..=u16::MAX).step_by(257) {
            assert_eq!(byte_swap(byte_swap(v)), v);
        }
        assert_eq!(byte_swap(u16::MAX), u16::MAX);
    }
}
