// Licensed under the Apache-2.0 license

//! I2C master driver module.
//!
//! This module provides the transaction builder, the transport traits the
//! builder is executed through, register-framed transfers built on top of
//! them, and adapters to and from the embedded-hal I2C trait. It is designed
//! for bare-metal, `no_std` environments.

pub mod common;
pub mod error;
pub mod hal_transport;
pub mod i2c_controller;
pub mod register;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod system_setup;
pub mod traits;
pub mod transaction;

pub use common::{
    AckCheck, AckValue, Direction, I2cConfig, I2cConfigBuilder, I2cSpeed, PinConfig,
    DEFAULT_TIMEOUT,
};
pub use error::Error;
pub use hal_transport::HalTransport;
pub use i2c_controller::I2cController;
pub use register::{read_register, write_register};
pub use system_setup::I2cSystemSetup;
pub use traits::{I2cHardwareCore, I2cMaster};
pub use transaction::{Command, Phase, Transaction};
