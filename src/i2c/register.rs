// Licensed under the Apache-2.0 license

//! Register-framed transfers for devices with a registered interface.
//!
//! Read:
//! ```text
//! | start | addr+W+ack | reg+ack | start | addr+R+ack | read n-1 + ack | read 1 + nack | stop |
//! ```
//! Write:
//! ```text
//! | start | addr+W+ack | reg+ack | write n bytes + ack | stop |
//! ```
//!
//! The read direction change uses a repeated start, never stop + start, so no
//! other master can take the bus between selecting the register and reading it.

use crate::i2c::common::{address_byte, AckCheck, AckValue, Direction};
use crate::i2c::traits::I2cMaster;
use crate::i2c::transaction::Transaction;
use crate::i2c::Error;
use embedded_hal::i2c::SevenBitAddress;
use fugit::MillisDurationU32;

/// Read `buffer.len()` bytes starting at `register`.
///
/// An empty buffer returns `Ok(())` without touching the bus.
///
/// # Errors
///
/// Propagates the executor's error; `buffer` is only written for bytes the
/// device actually sent.
pub fn read_register<B: I2cMaster + ?Sized>(
    bus: &mut B,
    address: SevenBitAddress,
    register: u8,
    buffer: &mut [u8],
    timeout: MillisDurationU32,
) -> Result<(), Error> {
    let Some((last, head)) = buffer.split_last_mut() else {
        return Ok(());
    };

    let mut txn = Transaction::new();
    txn.start()?;
    txn.write_byte(address_byte(address, Direction::Write)?, AckCheck::Enabled)?;
    txn.write_byte(register, AckCheck::Enabled)?;
    txn.start()?;
    txn.write_byte(address_byte(address, Direction::Read)?, AckCheck::Enabled)?;
    if !head.is_empty() {
        txn.read(head, AckValue::Ack)?;
    }
    txn.read(core::slice::from_mut(last), AckValue::Nack)?;
    txn.stop()?;

    bus.execute(txn, timeout)
}

/// Write `data` starting at `register`.
///
/// Empty `data` still selects the register: start, address, register, stop.
///
/// # Errors
///
/// Propagates the executor's error.
pub fn write_register<B: I2cMaster + ?Sized>(
    bus: &mut B,
    address: SevenBitAddress,
    register: u8,
    data: &[u8],
    timeout: MillisDurationU32,
) -> Result<(), Error> {
    let mut txn = Transaction::new();
    txn.start()?;
    txn.write_byte(address_byte(address, Direction::Write)?, AckCheck::Enabled)?;
    txn.write_byte(register, AckCheck::Enabled)?;
    if !data.is_empty() {
        txn.write(data, AckCheck::Enabled)?;
    }
    txn.stop()?;

    bus.execute(txn, timeout)
}
