// Licensed under the Apache-2.0 license

//! I2C transaction builder.
//!
//! A [`Transaction`] is an ordered list of primitive bus commands that an
//! [`I2cMaster`](crate::i2c::traits::I2cMaster) executes as one atomic unit:
//!
//! ```text
//! | start | addr+W | reg | start | addr+R | read n-1 (ACK) | read 1 (NACK) | stop |
//! ```
//!
//! The builder runs every appended command through the [`Phase`] state
//! machine, so a transaction that reaches an executor always starts with a
//! start condition, puts an address byte after every start and ends with a
//! stop. Executors drive the same state machine while running the commands to
//! tell an address NACK from a data NACK.
//!
//! The transaction borrows the caller's buffers for its lifetime and is
//! consumed by `execute`, so its command storage is released on every exit
//! path.

use crate::i2c::common::{AckCheck, AckValue, Direction};
use crate::i2c::Error;

/// Maximum number of commands in one transaction.
pub const MAX_COMMANDS: usize = 32;

/// One primitive bus operation.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Start, or repeated start if the bus is already owned.
    Start,
    /// Single byte written by the master.
    WriteByte { byte: u8, ack_check: AckCheck },
    /// Consecutive bytes written by the master.
    Write { bytes: &'a [u8], ack_check: AckCheck },
    /// Bytes read into `buffer`; the master answers each one with `ack`.
    Read { buffer: &'a mut [u8], ack: AckValue },
    /// Stop condition, releasing the bus.
    Stop,
}

/// Transaction progress, from the master's point of view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Started,
    RepeatedStart,
    AddressSent(Direction),
    RegisterSent,
    DataTransferring(Direction),
    Stopped,
    /// Terminal state of an executor after a failed ACK check or timeout.
    /// The executor issues a stop on entering it; no command is legal after.
    Aborted,
}

impl Phase {
    /// State after `command`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `command` is not legal here.
    pub fn advance(self, command: &Command<'_>) -> Result<Phase, Error> {
        use Phase::*;

        let next = match (self, command) {
            (Idle, Command::Start) => Started,
            (AddressSent(_) | RegisterSent | DataTransferring(_), Command::Start) => RepeatedStart,

            (Started | RepeatedStart, Command::WriteByte { byte, .. }) => {
                AddressSent(Direction::of_address_byte(*byte))
            }

            (AddressSent(Direction::Write), Command::WriteByte { .. }) => RegisterSent,
            (AddressSent(Direction::Write), Command::Write { bytes, .. }) if bytes.is_empty() => {
                self
            }
            (
                AddressSent(Direction::Write) | RegisterSent | DataTransferring(Direction::Write),
                Command::Write { .. } | Command::WriteByte { .. },
            ) => DataTransferring(Direction::Write),

            (
                AddressSent(Direction::Read) | DataTransferring(Direction::Read),
                Command::Read { .. },
            ) => DataTransferring(Direction::Read),

            (AddressSent(_) | RegisterSent | DataTransferring(_), Command::Stop) => Stopped,

            // includes everything after Stopped or Aborted
            _ => return Err(Error::InvalidArgument),
        };
        Ok(next)
    }

    /// Whether a byte written in this phase is an address byte.
    #[must_use]
    pub fn expects_address(self) -> bool {
        matches!(self, Phase::Started | Phase::RepeatedStart)
    }
}

/// Command sequence under construction.
#[derive(Debug)]
pub struct Transaction<'a> {
    commands: heapless::Vec<Command<'a>, MAX_COMMANDS>,
    phase: Phase,
}

impl Default for Transaction<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Transaction<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: heapless::Vec::new(),
            phase: Phase::Idle,
        }
    }

    /// Queue a start condition. After the first one this is a repeated start.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if illegal in the current phase or the
    /// transaction is full.
    pub fn start(&mut self) -> Result<(), Error> {
        self.push(Command::Start)
    }

    /// # Errors
    ///
    /// `Error::InvalidArgument` if illegal in the current phase or the
    /// transaction is full.
    pub fn write_byte(&mut self, byte: u8, ack_check: AckCheck) -> Result<(), Error> {
        self.push(Command::WriteByte { byte, ack_check })
    }

    /// # Errors
    ///
    /// `Error::InvalidArgument` if illegal in the current phase or the
    /// transaction is full.
    pub fn write(&mut self, bytes: &'a [u8], ack_check: AckCheck) -> Result<(), Error> {
        self.push(Command::Write { bytes, ack_check })
    }

    /// # Errors
    ///
    /// `Error::InvalidArgument` if `buffer` is empty, the command is illegal in
    /// the current phase, or the transaction is full.
    pub fn read(&mut self, buffer: &'a mut [u8], ack: AckValue) -> Result<(), Error> {
        if buffer.is_empty() {
            return Err(Error::InvalidArgument);
        }
        self.push(Command::Read { buffer, ack })
    }

    /// # Errors
    ///
    /// `Error::InvalidArgument` if illegal in the current phase or the
    /// transaction is full.
    pub fn stop(&mut self) -> Result<(), Error> {
        self.push(Command::Stop)
    }

    /// Current builder phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the closing stop has been queued.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Stopped
    }

    #[must_use]
    pub fn commands(&self) -> &[Command<'a>] {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut [Command<'a>] {
        &mut self.commands
    }

    fn push(&mut self, command: Command<'a>) -> Result<(), Error> {
        let next = self.phase.advance(&command)?;
        self.commands
            .push(command)
            .map_err(|_| Error::InvalidArgument)?;
        self.phase = next;
        Ok(())
    }
}
