// Licensed under the Apache-2.0 license

//! On-target checks, reported over a serial-style sink.

pub mod functional;
