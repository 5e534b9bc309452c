// Licensed under the Apache-2.0 license

//! embedded-hal facade over a transaction executor.
//!
//! [`I2cController`] lets drivers written against `embedded_hal::i2c::I2c`
//! share a bus with the register access layer. Every embedded-hal
//! transaction becomes one [`Transaction`]: a start and address byte per
//! direction change, ACK on all read bytes except the last of each read run,
//! and a single closing stop.

use crate::common::{format_line, Logger, NoOpLogger};
use crate::i2c::common::{address_byte, AckCheck, AckValue, Direction, I2cConfig};
use crate::i2c::traits::I2cMaster;
use crate::i2c::transaction::{Transaction, MAX_COMMANDS};
use crate::i2c::Error;
use embedded_hal::i2c::{Operation, SevenBitAddress};

pub struct I2cController<H: I2cMaster, L: Logger = NoOpLogger> {
    pub hardware: H,
    pub config: I2cConfig,
    pub logger: L,
}

impl<H: I2cMaster> I2cController<H, NoOpLogger> {
    pub fn new(hardware: H, config: I2cConfig) -> Self {
        Self {
            hardware,
            config,
            logger: NoOpLogger,
        }
    }
}

impl<H: I2cMaster, L: Logger> I2cController<H, L> {
    fn build<'a>(
        addr: SevenBitAddress,
        operations: &'a mut [Operation<'_>],
    ) -> Result<Transaction<'a>, Error> {
        // mark the last non-empty read of every read run, walking backwards
        let mut nack: heapless::Vec<bool, MAX_COMMANDS> = heapless::Vec::new();
        nack.resize(operations.len(), false)
            .map_err(|()| Error::InvalidArgument)?;
        let mut run_needs_nack = true;
        for (op, flag) in operations.iter().zip(nack.iter_mut()).rev() {
            match op {
                Operation::Write(_) => run_needs_nack = true,
                Operation::Read(buffer) if !buffer.is_empty() && run_needs_nack => {
                    *flag = true;
                    run_needs_nack = false;
                }
                Operation::Read(_) => {}
            }
        }

        let mut txn = Transaction::new();
        let mut direction = None;
        for (op, last_of_run) in operations.iter_mut().zip(nack) {
            let op_direction = match op {
                Operation::Write(_) => Direction::Write,
                Operation::Read(_) => Direction::Read,
            };
            if direction != Some(op_direction) {
                txn.start()?;
                txn.write_byte(address_byte(addr, op_direction)?, AckCheck::Enabled)?;
                direction = Some(op_direction);
            }
            match op {
                Operation::Write(bytes) => {
                    if !bytes.is_empty() {
                        txn.write(*bytes, AckCheck::Enabled)?;
                    }
                }
                Operation::Read(buffer) => {
                    if !last_of_run {
                        if !buffer.is_empty() {
                            txn.read(buffer, AckValue::Ack)?;
                        }
                    } else if let Some((last, head)) = buffer.split_last_mut() {
                        if !head.is_empty() {
                            txn.read(head, AckValue::Ack)?;
                        }
                        txn.read(core::slice::from_mut(last), AckValue::Nack)?;
                    }
                }
            }
        }
        txn.stop()?;
        Ok(txn)
    }
}

impl<H: I2cMaster, L: Logger> embedded_hal::i2c::ErrorType for I2cController<H, L> {
    type Error = Error;
}

impl<H: I2cMaster, L: Logger> embedded_hal::i2c::I2c for I2cController<H, L> {
    fn transaction(
        &mut self,
        addr: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations.is_empty() {
            return Ok(());
        }
        let result = Self::build(addr, operations)
            .and_then(|txn| self.hardware.execute(txn, self.config.timeout));
        if let Err(e) = result {
            self.logger.error(&format_line(format_args!(
                "i2c transaction to 0x{addr:02X} failed: {e}"
            )));
        }
        result
    }
}
