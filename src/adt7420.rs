// SPDX-License-Identifier: Apache-2.0

//! ADT7420 digital temperature sensor (I2C).
//!
//! The temperature value pointer register is written first, then two
//! bytes are read back MSB first. The default 13-bit format leaves the
//! code left-aligned; the conversion keeps the sign.

use log::trace;

use crate::interface::I2cBus;
use crate::sensor::{Sensor, SensorState, TemperatureSensor};
use crate::units::{celsius_to_fahrenheit, raw_to_celsius};
use crate::Error;

/// Default 7-bit slave address (A0 and A1 tied low).
pub const DEFAULT_ADDRESS: u16 = 0x48;

const REG_TEMP_MSB: u8 = 0x00;
const REG_CONFIG: u8 = 0x03;

const CONFIG_CONTINUOUS: u8 = 0x00;
const CONFIG_SHUTDOWN: u8 = 0x60;

/// ADT7420 driver with exclusive ownership of its bus.
pub struct Adt7420<B> {
    bus: B,
    address: u16,
    state: SensorState,
}

impl<B, E> Adt7420<B>
where
    B: I2cBus<Error = E>,
{
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DEFAULT_ADDRESS)
    }

    pub fn with_address(bus: B, address: u16) -> Self {
        Adt7420 {
            bus,
            address,
            state: SensorState::Unopened,
        }
    }

    fn write_config(&mut self, value: u8) -> Result<(), Error<E>> {
        self.bus
            .write(self.address, &[REG_CONFIG, value])
            .map_err(Error::Comm)?;
        trace!("adt7420 config <- 0x{:02X}", value);
        Ok(())
    }
}

impl<B, E> Sensor for Adt7420<B>
where
    B: I2cBus<Error = E>,
{
    type Error = Error<E>;

    fn open(&mut self) -> Result<(), Self::Error> {
        // The part has no identity register and powers up converting;
        // there is nothing to program here.
        self.state = SensorState::Opened;
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.write_config(CONFIG_CONTINUOUS)?;
        self.state = SensorState::Started;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.write_config(CONFIG_SHUTDOWN)?;
        self.state = SensorState::Stopped;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.state = SensorState::Closed;
        Ok(())
    }

    fn state(&self) -> SensorState {
        self.state
    }
}

impl<B, E> TemperatureSensor for Adt7420<B>
where
    B: I2cBus<Error = E>,
{
    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        let mut rx = [0u8; 2];
        self.bus
            .write_read(self.address, &[REG_TEMP_MSB], &mut rx)
            .map_err(Error::Comm)?;
        let raw = u16::from_be_bytes(rx);
        trace!("adt7420 raw 0x{:04X}", raw);
        Ok(raw)
    }

    fn read_celsius(&mut self) -> Result<f32, Self::Error> {
        Ok(raw_to_celsius(self.read_raw()?))
    }

    fn read_fahrenheit(&mut self) -> Result<f32, Self::Error> {
        Ok(celsius_to_fahrenheit(raw_to_celsius(self.read_raw()?)))
    }
}
