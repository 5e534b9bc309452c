// Licensed under the Apache-2.0 license

//! MMC5603NJ magnetometer access layer.
//!
//! Register reads and writes with the sensor's address fixed by a
//! [`DeviceConfig`], plus the WHO_AM_I identity check.

pub mod device;
pub mod registers;

pub use device::{byte_swap, DeviceConfig, IdentityCheck, Mmc5603};
