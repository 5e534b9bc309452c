// Licensed under the Apache-2.0 license

//! Transaction executor on top of any `embedded_hal::i2c::I2c` bus.
//!
//! Vendor HALs already implement the embedded-hal transaction contract: one
//! start, adjacent operations of the same direction merged on the wire, a
//! repeated start between operations of different direction, NACK on the last
//! byte of every read run and a closing stop. [`HalTransport`] maps a
//! [`Transaction`] onto that contract, so register transfers run unchanged on
//! real hardware.
//!
//! Only transactions the contract can express are accepted: a single target
//! address, ACK checks on every written byte, a direction change at every
//! repeated start, and reads that ACK every byte but the last of each read
//! phase. Anything else is `Error::InvalidArgument`.
//! The HAL's own timeout bounds the transfer; the `timeout` argument is not
//! enforced here.

use crate::i2c::common::{AckCheck, AckValue, Direction};
use crate::i2c::traits::I2cMaster;
use crate::i2c::transaction::{Command, Phase, Transaction, MAX_COMMANDS};
use crate::i2c::Error;
use embedded_hal::i2c::{Error as _, I2c, Operation, SevenBitAddress};
use fugit::MillisDurationU32;

pub struct HalTransport<I> {
    i2c: I,
}

impl<I: I2c> HalTransport<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    /// Give the wrapped bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> I2cMaster for HalTransport<I> {
    fn execute(
        &mut self,
        mut transaction: Transaction<'_>,
        _timeout: MillisDurationU32,
    ) -> Result<(), Error> {
        if !transaction.is_complete() {
            return Err(Error::InvalidArgument);
        }

        let mut target: Option<SevenBitAddress> = None;
        let mut direction: Option<Direction> = None;
        let mut phase = Phase::Idle;
        // a read run that has not NACKed its final byte yet
        let mut read_open = false;
        let mut operations: heapless::Vec<Operation<'_>, MAX_COMMANDS> = heapless::Vec::new();

        for command in transaction.commands_mut() {
            let next = phase.advance(command)?;
            let operation = match command {
                Command::Start | Command::Stop => {
                    if read_open {
                        return Err(Error::InvalidArgument);
                    }
                    None
                }
                // the HAL always fails on a NACK
                Command::WriteByte {
                    ack_check: AckCheck::Disabled,
                    ..
                }
                | Command::Write {
                    ack_check: AckCheck::Disabled,
                    ..
                } => return Err(Error::InvalidArgument),
                Command::WriteByte { byte, .. } if phase.expects_address() => {
                    let address = *byte >> 1;
                    let dir = Direction::of_address_byte(*byte);
                    if target.is_some_and(|t| t != address) {
                        return Err(Error::InvalidArgument);
                    }
                    // same-direction phases would be merged without a repeated start
                    if phase == Phase::RepeatedStart && direction == Some(dir) {
                        return Err(Error::InvalidArgument);
                    }
                    target = Some(address);
                    direction = Some(dir);
                    None
                }
                Command::WriteByte { byte, .. } => {
                    Some(Operation::Write(core::slice::from_ref(byte)))
                }
                Command::Write { bytes, .. } => Some(Operation::Write(*bytes)),
                Command::Read { buffer, ack } => {
                    if phase == next && !read_open {
                        // more bytes requested after the run was NACKed
                        return Err(Error::InvalidArgument);
                    }
                    read_open = *ack == AckValue::Ack;
                    Some(Operation::Read(buffer))
                }
            };
            if let Some(operation) = operation {
                operations
                    .push(operation)
                    .map_err(|_| Error::InvalidArgument)?;
            }
            phase = next;
        }

        let address = target.ok_or(Error::InvalidArgument)?;
        self.i2c
            .transaction(address, &mut operations)
            .map_err(|e| Error::from(e.kind()))
    }
}
