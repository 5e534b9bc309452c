// Licensed under the Apache-2.0 license

//! # I2C Transport Traits
//!
//! The register access layer only needs a transport that can run a
//! pre-built command sequence. Bring-up of the peripheral is kept in a
//! separate trait so the same executor can be driven by code that never
//! touches pin or clock configuration (test doubles, shared buses).
//!
//! ```text
//! I2cHardwareCore (configure + install)
//!     └── I2cMaster (execute transactions)
//! ```

use crate::i2c::common::I2cConfig;
use crate::i2c::transaction::Transaction;
use crate::i2c::Error;
use fugit::MillisDurationU32;

/// Peripheral bring-up.
///
/// # Examples
///
/// ```rust,no_run
/// use mmc5603_ddk::i2c::{I2cConfigBuilder, I2cHardwareCore, I2cSpeed};
///
/// fn bring_up<T: I2cHardwareCore>(bus: &mut T) -> Result<(), mmc5603_ddk::i2c::Error> {
///     let config = I2cConfigBuilder::new()
///         .port(1)
///         .pins(26, 27)
///         .speed(I2cSpeed::Standard)
///         .build();
///     bus.configure(&config)?;
///     bus.install()
/// }
/// ```
pub trait I2cHardwareCore {
    /// Apply pin assignment, pull-ups and clock speed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the hardware cannot honour the
    /// configuration.
    fn configure(&mut self, config: &I2cConfig) -> Result<(), Error>;

    /// Acquire the port in master mode with the configured driver buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is unavailable or not configured.
    fn install(&mut self) -> Result<(), Error>;
}

/// Transaction executor.
///
/// Implementations run every command of `transaction` in order, blocking for
/// at most `timeout`. When an ACK check fails or the timeout expires they
/// issue a stop condition before returning, so the bus is never left owned.
/// The transaction is consumed and dropped on every path.
pub trait I2cMaster {
    /// # Errors
    ///
    /// - `Error::AddressNack` if an address byte is not acknowledged
    /// - `Error::DataNack` if any other written byte is not acknowledged
    /// - `Error::Timeout` if the transaction exceeds `timeout`
    /// - `Error::InvalidArgument` if the transaction is incomplete
    fn execute(
        &mut self,
        transaction: Transaction<'_>,
        timeout: MillisDurationU32,
    ) -> Result<(), Error>;
}

impl<T: I2cHardwareCore + ?Sized> I2cHardwareCore for &mut T {
    fn configure(&mut self, config: &I2cConfig) -> Result<(), Error> {
        (**self).configure(config)
    }

    fn install(&mut self) -> Result<(), Error> {
        (**self).install()
    }
}

impl<T: I2cMaster + ?Sized> I2cMaster for &mut T {
    fn execute(
        &mut self,
        transaction: Transaction<'_>,
        timeout: MillisDurationU32,
    ) -> Result<(), Error> {
        (**self).execute(transaction, timeout)
    }
}
