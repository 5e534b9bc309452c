// Licensed under the Apache-2.0 license

//! In-memory I2C bus for host tests and bring-up without hardware.
//!
//! [`SimulatedBus`] executes transactions against attached
//! [`SimulatedDevice`]s, each a 256-byte register file with an auto-incrementing
//! register pointer, and records every bus event of the most recent
//! transaction. Faults can be injected per device (address NACK, read address
//! NACK, NACK of the k-th data byte) or per bus (clock stretching, byte time) to exercise the
//! executor's abort path.

use crate::i2c::common::{AckCheck, AckValue, Direction, I2cConfig, MAX_SEVEN_BIT_ADDRESS};
use crate::i2c::traits::{I2cHardwareCore, I2cMaster};
use crate::i2c::transaction::{Command, Phase, Transaction};
use crate::i2c::Error;
use embedded_hal::i2c::SevenBitAddress;
use fugit::MillisDurationU32;

pub const MAX_DEVICES: usize = 4;
pub const TRACE_CAPACITY: usize = 128;

/// Bus-level event as seen on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    /// Byte driven by the master and whether the slave acknowledged it.
    Write { byte: u8, acked: bool },
    /// Byte driven by the slave and the master's answer.
    Read { byte: u8, ack: AckValue },
    Stop,
}

/// Register-file slave device.
#[derive(Clone, Debug)]
pub struct SimulatedDevice {
    address: SevenBitAddress,
    registers: [u8; 256],
    pointer: u8,
    /// Data bytes received since the last address match.
    received: usize,
    nack_address: bool,
    nack_read_address: bool,
    nack_data_byte: Option<usize>,
}

impl SimulatedDevice {
    #[must_use]
    pub fn new(address: SevenBitAddress) -> Self {
        Self {
            address,
            registers: [0; 256],
            pointer: 0,
            received: 0,
            nack_address: false,
            nack_read_address: false,
            nack_data_byte: None,
        }
    }

    #[must_use]
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        if let Some(slot) = self.registers.get_mut(usize::from(register)) {
            *slot = value;
        }
    }

    /// Fill consecutive registers, wrapping after 0xFF.
    pub fn set_registers(&mut self, first: u8, values: &[u8]) {
        let mut register = first;
        for value in values {
            self.set_register(register, *value);
            register = register.wrapping_add(1);
        }
    }

    #[must_use]
    pub fn register(&self, register: u8) -> u8 {
        self.registers
            .get(usize::from(register))
            .copied()
            .unwrap_or_default()
    }

    /// Stop acknowledging the device address.
    pub fn nack_address(&mut self) {
        self.nack_address = true;
    }

    /// Acknowledge the address for writes only, so register reads fail after
    /// the repeated start.
    pub fn nack_read_address(&mut self) {
        self.nack_read_address = true;
    }

    /// NACK the `index`-th byte written after the address (0 is the register
    /// index) in every write phase.
    pub fn nack_data_byte(&mut self, index: usize) {
        self.nack_data_byte = Some(index);
    }

    fn matches(&self, address_byte: u8) -> bool {
        let refused = match Direction::of_address_byte(address_byte) {
            Direction::Write => self.nack_address,
            Direction::Read => self.nack_address || self.nack_read_address,
        };
        !refused && self.address == address_byte >> 1
    }

    fn select(&mut self) {
        self.received = 0;
    }

    fn receive(&mut self, byte: u8) -> bool {
        let index = self.received;
        self.received += 1;
        if self.nack_data_byte == Some(index) {
            return false;
        }
        if index == 0 {
            self.pointer = byte;
        } else {
            self.set_register(self.pointer, byte);
            self.pointer = self.pointer.wrapping_add(1);
        }
        true
    }

    fn transmit(&mut self) -> u8 {
        let byte = self.register(self.pointer);
        self.pointer = self.pointer.wrapping_add(1);
        byte
    }
}

/// Simulated bus master with attached devices.
#[derive(Debug, Default)]
pub struct SimulatedBus {
    devices: heapless::Vec<SimulatedDevice, MAX_DEVICES>,
    trace: heapless::Vec<BusEvent, TRACE_CAPACITY>,
    config: Option<I2cConfig>,
    installed: bool,
    phase: Phase,
    byte_time_ms: u32,
    clock_stretch_ms: u32,
    transactions: usize,
}

impl SimulatedBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// `Error::InvalidArgument` if the address is not 7-bit, already taken,
    /// or the bus is full.
    pub fn attach(&mut self, device: SimulatedDevice) -> Result<(), Error> {
        if device.address > MAX_SEVEN_BIT_ADDRESS || self.device(device.address).is_some() {
            return Err(Error::InvalidArgument);
        }
        self.devices.push(device).map_err(|_| Error::InvalidArgument)
    }

    #[must_use]
    pub fn device(&self, address: SevenBitAddress) -> Option<&SimulatedDevice> {
        self.devices.iter().find(|d| d.address == address)
    }

    pub fn device_mut(&mut self, address: SevenBitAddress) -> Option<&mut SimulatedDevice> {
        self.devices.iter_mut().find(|d| d.address == address)
    }

    /// Time each byte spends on the wire.
    pub fn set_byte_time(&mut self, time: MillisDurationU32) {
        self.byte_time_ms = time.to_millis();
    }

    /// Extra time slaves hold SCL low after every address byte.
    pub fn set_clock_stretch(&mut self, time: MillisDurationU32) {
        self.clock_stretch_ms = time.to_millis();
    }

    /// Events of the most recent transaction.
    #[must_use]
    pub fn trace(&self) -> &[BusEvent] {
        &self.trace
    }

    /// Executor phase, `Stopped` or `Aborted` once a transaction has run.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of transactions submitted so far.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions
    }

    #[must_use]
    pub fn config(&self) -> Option<&I2cConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    fn record(&mut self, event: BusEvent) {
        // the trace is diagnostic; a full buffer keeps the oldest events
        let _ = self.trace.push(event);
    }

    /// Enter `Aborted` and release the bus.
    fn abort(&mut self) {
        self.phase = Phase::Aborted;
        self.record(BusEvent::Stop);
    }

    fn clock_byte(&self, elapsed_ms: &mut u32, timeout_ms: u32) -> Result<(), Error> {
        *elapsed_ms = elapsed_ms.saturating_add(self.byte_time_ms);
        if self.phase.expects_address() {
            *elapsed_ms = elapsed_ms.saturating_add(self.clock_stretch_ms);
        }
        if *elapsed_ms > timeout_ms {
            return Err(Error::Timeout);
        }
        Ok(())
    }

    fn write_byte(
        &mut self,
        active: &mut Option<usize>,
        byte: u8,
        ack_check: AckCheck,
    ) -> Result<(), Error> {
        let address_phase = self.phase.expects_address();
        let acked = if address_phase {
            *active = self.devices.iter().position(|d| d.matches(byte));
            match active.and_then(|i| self.devices.get_mut(i)) {
                Some(device) => {
                    if Direction::of_address_byte(byte) == Direction::Write {
                        device.select();
                    }
                    true
                }
                None => false,
            }
        } else {
            active
                .and_then(|i| self.devices.get_mut(i))
                .is_some_and(|device| device.receive(byte))
        };

        self.record(BusEvent::Write { byte, acked });
        if !acked && ack_check == AckCheck::Enabled {
            return Err(if address_phase {
                Error::AddressNack
            } else {
                Error::DataNack
            });
        }
        Ok(())
    }

    fn run(&mut self, transaction: &mut Transaction<'_>, timeout_ms: u32) -> Result<(), Error> {
        let mut elapsed_ms = 0u32;
        let mut active = None;

        for command in transaction.commands_mut() {
            let next = self.phase.advance(command)?;
            match command {
                Command::Start => {
                    let event = if self.phase == Phase::Idle {
                        BusEvent::Start
                    } else {
                        BusEvent::RepeatedStart
                    };
                    self.record(event);
                }
                Command::WriteByte { byte, ack_check } => {
                    self.clock_byte(&mut elapsed_ms, timeout_ms)?;
                    self.write_byte(&mut active, *byte, *ack_check)?;
                }
                Command::Write { bytes, ack_check } => {
                    for byte in bytes.iter() {
                        self.clock_byte(&mut elapsed_ms, timeout_ms)?;
                        self.write_byte(&mut active, *byte, *ack_check)?;
                    }
                }
                Command::Read { buffer, ack } => {
                    for slot in buffer.iter_mut() {
                        self.clock_byte(&mut elapsed_ms, timeout_ms)?;
                        *slot = self.read_byte(active, *ack);
                    }
                }
                Command::Stop => self.record(BusEvent::Stop),
            }
            self.phase = next;
        }
        Ok(())
    }

    fn read_byte(&mut self, active: Option<usize>, ack: AckValue) -> u8 {
        // nobody driving SDA reads as all ones
        let byte = active
            .and_then(|i| self.devices.get_mut(i))
            .map_or(0xFF, SimulatedDevice::transmit);
        self.record(BusEvent::Read { byte, ack });
        byte
    }
}

impl I2cHardwareCore for SimulatedBus {
    fn configure(&mut self, config: &I2cConfig) -> Result<(), Error> {
        if config.pins.sda_io == config.pins.scl_io {
            return Err(Error::InvalidArgument);
        }
        self.config = Some(*config);
        Ok(())
    }

    fn install(&mut self) -> Result<(), Error> {
        if self.config.is_none() {
            return Err(Error::InvalidArgument);
        }
        self.installed = true;
        Ok(())
    }
}

impl I2cMaster for SimulatedBus {
    fn execute(
        &mut self,
        mut transaction: Transaction<'_>,
        timeout: MillisDurationU32,
    ) -> Result<(), Error> {
        self.trace.clear();
        if !transaction.is_complete() {
            return Err(Error::InvalidArgument);
        }
        self.transactions += 1;
        self.phase = Phase::Idle;

        let result = self.run(&mut transaction, timeout.to_millis());
        if result.is_err() {
            self.abort();
        }
        result
    }
}
