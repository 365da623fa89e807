// SPDX-License-Identifier: Apache-2.0

//! Linux userspace drivers for a small family of Analog Devices sensors:
//! the ADXL362 accelerometer, the AD7790 sigma-delta ADC, the ADT7420
//! temperature sensor, and the CN0357 carbon-monoxide gas sensor (an
//! AD5270 rheostat plus an AD7790 sharing one SPI bus).
//!
//! Every driver owns its bus value and exposes the [`sensor::Sensor`]
//! lifecycle alongside one of the capability traits. Hardware access
//! goes through the [`interface`] traits; tests run against the scripted
//! mocks in [`interface::mock`].

pub mod ad7790;
pub mod adt7420;
pub mod adxl362;
pub mod cn0357;
pub mod interface;
pub mod sensor;
pub mod units;

pub use ad7790::{Ad7790, Ad7790Part};
pub use adt7420::Adt7420;
pub use adxl362::Adxl362;
pub use cn0357::{Ad5270, Cn0357};
pub use sensor::{
    Accelerometer, AnalogIn, GasSensor, Sensor, SensorState, TemperatureSensor,
};

/// Errors in this crate
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// Sensor communication error
    Comm(E),
    /// Chip-select pin error
    Pin(E),

    /// The ADXL362 device ID did not read back as 0xAD
    InvalidDeviceId(u8),
    /// The ADXL362 MEMS ID did not read back as 0x1D
    InvalidMemsId(u8),
    /// The ADXL362 part ID did not read back as 0xF2
    InvalidPartId(u8),
    /// A mode register write did not read back
    ModeMismatch { wrote: u8, read: u8 },
    /// A filter register write did not read back
    FilterMismatch { wrote: u8, read: u8 },
    /// The data-ready poll budget ran out before a conversion completed
    DataReadyTimeout,
    /// A rheostat wiper write did not read back
    WiperMismatch { wrote: u16, read: u16 },
}
