// Licensed under the Apache-2.0 license

use core::fmt;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

/// Failure of a bus transaction.
///
/// NACK variants name the phase that went unacknowledged; the executor has
/// already issued a stop condition by the time one is returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// No device acknowledged its address byte.
    AddressNack,
    /// A register index or payload byte was not acknowledged.
    DataNack,
    /// The transaction did not complete within its time bound.
    Timeout,
    /// Malformed transaction or out-of-range argument.
    InvalidArgument,
    /// Any other failure reported by the underlying transport.
    Bus(ErrorKind),
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => Error::AddressNack,
            ErrorKind::NoAcknowledge(_) => Error::DataNack,
            other => Error::Bus(other),
        }
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match *self {
            Error::AddressNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Error::DataNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Error::Timeout | Error::InvalidArgument => ErrorKind::Other,
            Error::Bus(kind) => kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AddressNack => f.write_str("device address not acknowledged"),
            Error::DataNack => f.write_str("data byte not acknowledged"),
            Error::Timeout => f.write_str("transaction timed out"),
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::Bus(kind) => write!(f, "bus error: {kind}"),
        }
    }
}

impl core::error::Error for Error {}
