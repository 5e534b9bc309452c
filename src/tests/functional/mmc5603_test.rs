// Licensed under the Apache-2.0 license

use crate::common::Logger;
use crate::i2c::common::MAX_SEVEN_BIT_ADDRESS;
use crate::i2c::register::read_register;
use crate::i2c::traits::I2cMaster;
use crate::i2c::Error;
use crate::mmc5603::registers::{CTRL_REG0, WHO_AM_I_REG};
use crate::mmc5603::{byte_swap, Mmc5603};
use embedded_io::Write;

/// Run the sensor checks against live hardware and report each one.
///
/// Returns the number of failed checks.
pub fn run_mmc5603_tests<W, B, L>(out: &mut W, sensor: &mut Mmc5603<B, L>) -> usize
where
    W: Write,
    B: I2cMaster,
    L: Logger,
{
    let _ = writeln!(out, "\r\n=== MMC5603NJ Tests ===\r");

    let failures = [
        test_identity(out, sensor),
        test_empty_read(out, sensor),
        test_control_write(out, sensor),
        test_absent_device(out, sensor),
        test_byte_swap(out),
    ]
    .iter()
    .filter(|passed| !**passed)
    .count();

    if failures == 0 {
        let _ = writeln!(out, "\r\n=== All MMC5603NJ Tests Passed ===\r");
    } else {
        let _ = writeln!(out, "\r\n=== {failures} MMC5603NJ Test(s) Failed ===\r");
    }
    failures
}

fn report<W: Write>(out: &mut W, passed: bool) -> bool {
    if passed {
        let _ = writeln!(out, "PASSED\r");
    } else {
        let _ = writeln!(out, "FAILED\r");
    }
    passed
}

fn test_identity<W, B, L>(out: &mut W, sensor: &mut Mmc5603<B, L>) -> bool
where
    W: Write,
    B: I2cMaster,
    L: Logger,
{
    let _ = write!(out, "Testing WHO_AM_I... ");
    let passed = match sensor.verify_identity() {
        Ok(check) => check.is_match(),
        Err(e) => {
            let _ = write!(out, "{e} ");
            false
        }
    };
    report(out, passed)
}

fn test_empty_read<W, B, L>(out: &mut W, sensor: &mut Mmc5603<B, L>) -> bool
where
    W: Write,
    B: I2cMaster,
    L: Logger,
{
    let _ = write!(out, "Testing zero-length read... ");
    let mut empty: [u8; 0] = [];
    let passed = sensor.read_device_register(WHO_AM_I_REG, &mut empty).is_ok();
    report(out, passed)
}

fn test_control_write<W, B, L>(out: &mut W, sensor: &mut Mmc5603<B, L>) -> bool
where
    W: Write,
    B: I2cMaster,
    L: Logger,
{
    let _ = write!(out, "Testing control register write... ");
    // all-zero control is the idle state
    let passed = sensor.write_device_register(CTRL_REG0, &[0x00]).is_ok();
    report(out, passed)
}

fn test_absent_device<W, B, L>(out: &mut W, sensor: &mut Mmc5603<B, L>) -> bool
where
    W: Write,
    B: I2cMaster,
    L: Logger,
{
    let _ = write!(out, "Testing address NACK from reserved address... ");
    let timeout = sensor.config().timeout;
    let mut buf = [0xA5u8; 1];
    let result = read_register(
        sensor.bus_mut(),
        MAX_SEVEN_BIT_ADDRESS,
        WHO_AM_I_REG,
        &mut buf,
        timeout,
    );
    report(out, result == Err(Error::AddressNack) && buf == [0xA5])
}

fn test_byte_swap<W: Write>(out: &mut W) -> bool {
    let _ = write!(out, "Testing byte swap... ");
    report(out, byte_swap(0x1234) == 0x3412 && byte_swap(byte_swap(0xBEEF)) == 0xBEEF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::sim::{SimulatedBus, SimulatedDevice};
    use crate::mmc5603::registers::{DEVICE_ID, MMC5603NJ_I2C_ADDR};
    use crate::mmc5603::DeviceConfig;
    use core::convert::Infallible;
    use std::string::String;
    use std::vec::Vec;

    #[derive(Default)]
    struct Console(Vec<u8>);

    impl embedded_io::ErrorType for Console {
        type Error = Infallible;
    }

    impl Write for Console {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl Console {
        fn text(&self) -> String {
            String::from_utf8(self.0.clone()).unwrap()
        }
    }

    fn bus_with_sensor(id: u8) -> SimulatedBus {
        let mut device = SimulatedDevice::new(MMC5603NJ_I2C_ADDR);
        device.set_register(WHO_AM_I_REG, id);
        let mut bus = SimulatedBus::new();
        bus.attach(device).unwrap();
        bus
    }

    #[test]
    fn test_runner_all_pass() {
        let mut sensor = Mmc5603::new(bus_with_sensor(DEVICE_ID), DeviceConfig::default());
        let mut console = Console::default();

        assert_eq!(run_mmc5603_tests(&mut console, &mut sensor), 0);

        let text = console.text();
        assert_eq!(text.matches("PASSED").count(), 5);
        assert!(!text.contains("FAILED"));
        assert!(text.contains("All MMC5603NJ Tests Passed"));
    }

    #[test]
    fn test_runner_reports_wrong_identity() {
        let mut sensor = Mmc5603::new(bus_with_sensor(0x20), DeviceConfig::default());
        let mut console = Console::default();

        assert_eq!(run_mmc5603_tests(&mut console, &mut sensor), 1);
        let text = console.text();
        assert!(text.contains("Testing WHO_AM_I... FAILED"));
        assert!(text.contains("1 MMC5603NJ Test(s) Failed"));
    }

    #[test]
    fn test_runner_without_sensor() {
        let mut sensor = Mmc5603::new(SimulatedBus::new(), DeviceConfig::default());
        let mut console = Console::default();

        // identity and control write fail; the others need no sensor
        assert_eq!(run_mmc5603_tests(&mut console, &mut sensor), 2);
        assert!(console
            .text()
            .contains("Testing WHO_AM_I... device address not acknowledged FAILED"));
    }
}
