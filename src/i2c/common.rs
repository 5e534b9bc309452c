// Licensed under the Apache-2.0 license

//! Common types and constants for the I2C master driver.
//!
//! This module provides the bus configuration, the protocol-level enums used
//! when framing transactions (direction bit, ACK handling) and the default
//! transaction timeout.

use embedded_hal::i2c::SevenBitAddress;
use fugit::MillisDurationU32;

/// Upper bound on the wall time of one transaction unless configured otherwise.
pub const DEFAULT_TIMEOUT: MillisDurationU32 = MillisDurationU32::millis(1000);

/// Highest valid 7-bit device address.
pub const MAX_SEVEN_BIT_ADDRESS: SevenBitAddress = 0x7F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum I2cSpeed {
    Standard = 100_000,
    Fast = 400_000,
    FastPlus = 1_000_000,
}

impl I2cSpeed {
    #[must_use]
    pub const fn hz(self) -> u32 {
        self as u32
    }
}

/// Transfer direction, encoded in bit 0 of the byte following a start.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

impl Direction {
    /// Direction encoded in an address byte already on the wire.
    #[must_use]
    pub const fn of_address_byte(byte: u8) -> Self {
        if byte & 1 == 0 {
            Direction::Write
        } else {
            Direction::Read
        }
    }
}

/// Acknowledge bit the master drives after each byte it reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AckValue {
    Ack = 0,
    Nack = 1,
}

/// Whether the master checks the slave's acknowledge after a written byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AckCheck {
    Enabled,
    Disabled,
}

/// Combine a 7-bit address with the direction bit.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if `address` does not fit in 7 bits.
pub fn address_byte(
    address: SevenBitAddress,
    direction: Direction,
) -> Result<u8, crate::i2c::Error> {
    if address > MAX_SEVEN_BIT_ADDRESS {
        return Err(crate::i2c::Error::InvalidArgument);
    }
    Ok((address << 1) | direction as u8)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PinConfig {
    pub sda_io: u8,
    pub scl_io: u8,
    pub sda_pullup: bool,
    pub scl_pullup: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct I2cConfig {
    pub port: u8,
    pub pins: PinConfig,
    pub speed: I2cSpeed,
    /// Driver receive buffer length; 0 leaves it disabled (master mode).
    pub rx_buffer_len: usize,
    /// Driver transmit buffer length; 0 leaves it disabled (master mode).
    pub tx_buffer_len: usize,
    pub timeout: MillisDurationU32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        I2cConfigBuilder::new().build()
    }
}

pub struct I2cConfigBuilder {
    port: u8,
    pins: Option<PinConfig>,
    speed: I2cSpeed,
    rx_buffer_len: usize,
    tx_buffer_len: usize,
    timeout: MillisDurationU32,
}

impl Default for I2cConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl I2cConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: 0,
            pins: None,
            speed: I2cSpeed::Standard,
            rx_buffer_len: 0,
            tx_buffer_len: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }
    #[must_use]
    pub fn port(mut self, port: u8) -> Self {
        self.port = port;
        self
    }
    #[must_use]
    pub fn pins(mut self, sda_io: u8, scl_io: u8) -> Self {
        let pullups = self.pins.map_or(true, |p| p.sda_pullup);
        self.pins = Some(PinConfig {
            sda_io,
            scl_io,
            sda_pullup: pullups,
            scl_pullup: pullups,
        });
        self
    }
    /// Enable or disable the internal pull-ups on both lines.
    #[must_use]
    pub fn pullups(mut self, enabled: bool) -> Self {
        let mut pins = self.pins.unwrap_or(PinConfig {
            sda_io: 0,
            scl_io: 0,
            sda_pullup: enabled,
            scl_pullup: enabled,
        });
        pins.sda_pullup = enabled;
        pins.scl_pullup = enabled;
        self.pins = Some(pins);
        self
    }
    #[must_use]
    pub fn speed(mut self, speed: I2cSpeed) -> Self {
        self.speed = speed;
        self
    }
    #[must_use]
    pub fn buffers(mut self, rx_len: usize, tx_len: usize) -> Self {
        self.rx_buffer_len = rx_len;
        self.tx_buffer_len = tx_len;
        self
    }
    #[must_use]
    pub fn timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.timeout = timeout;
        self
    }
    #[must_use]
    pub fn build(self) -> I2cConfig {
        I2cConfig {
            port: self.port,
            pins: self.pins.unwrap_or(PinConfig {
                sda_io: 0,
                scl_io: 0,
                sda_pullup: true,
                scl_pullup: true,
            }),
            speed: self.speed,
            rx_buffer_len: self.rx_buffer_len,
            tx_buffer_len: self.tx_buffer_len,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::Error;

    #[test]
    fn test_builder_defaults() {
        let config = I2cConfigBuilder::new().build();
        assert_eq!(config.speed, I2cSpeed::Standard);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.rx_buffer_len, 0);
        assert_eq!(config.tx_buffer_len, 0);
        assert!(config.pins.sda_pullup && config.pins.scl_pullup);
    }

    #[test]
    fn test_builder_pins_keep_pullup_choice() {
        let config = I2cConfigBuilder::new()
            .pullups(false)
            .pins(26, 27)
            .speed(I2cSpeed::Fast)
            .build();
        assert_eq!(config.pins.sda_io, 26);
        assert_eq!(config.pins.scl_io, 27);
        assert!(!config.pins.sda_pullup);
        assert_eq!(config.speed.hz(), 400_000);
    }

    #[test]
    fn test_address_byte() {
        assert_eq!(address_byte(0x30, Direction::Write), Ok(0x60));
        assert_eq!(address_byte(0x30, Direction::Read), Ok(0x61));
        assert_eq!(address_byte(0x80, Direction::Write), Err(Error::InvalidArgument));
        assert_eq!(Direction::of_address_byte(0x61), Direction::Read);
    }
}
