// Licensed under the Apache-2.0 license

pub mod mmc5603_test;
