// SPDX-License-Identifier: Apache-2.0

//! Sensor lifecycle and capability traits.

/// Lifecycle state of a sensor handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    Unopened,
    Opened,
    Started,
    Stopped,
    Closed,
}

/// Common sensor lifecycle.
///
/// `open` configures the device and, where the chip supports it, verifies
/// its identity; a failed `open` leaves the handle unopened. `start` and
/// `stop` toggle measurement, `close` releases the device and only a
/// fresh `open` is valid afterwards. Measurement reads are only
/// meaningful between `start` and `stop`; the drivers do not enforce this
/// at runtime.
pub trait Sensor {
    /// Error type
    type Error;

    fn open(&mut self) -> Result<(), Self::Error>;
    fn start(&mut self) -> Result<(), Self::Error>;
    fn stop(&mut self) -> Result<(), Self::Error>;
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Current lifecycle state.
    fn state(&self) -> SensorState;
}

/// Three-axis accelerometer capability.
pub trait Accelerometer: Sensor {
    /// Reads the X-axis sample into `buf`, low byte first.
    fn read_x(&mut self, buf: &mut [u8; 2]) -> Result<(), Self::Error>;

    /// Reads the Y-axis sample into `buf`, low byte first.
    fn read_y(&mut self, buf: &mut [u8; 2]) -> Result<(), Self::Error>;

    /// Reads the Z-axis sample into `buf`, low byte first.
    fn read_z(&mut self, buf: &mut [u8; 2]) -> Result<(), Self::Error>;

    /// Reads all three axes into `buf` as X, Y, Z pairs, low byte first.
    fn read_xyz(&mut self, buf: &mut [u8; 6]) -> Result<(), Self::Error>;
}

/// Gas concentration capability.
pub trait GasSensor: Sensor {
    /// Gas concentration in parts per million.
    fn read_ppm(&mut self) -> Result<f32, Self::Error>;
}

/// Temperature capability.
pub trait TemperatureSensor: Sensor {
    /// Raw temperature register contents.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;

    /// Temperature in degrees Celsius.
    fn read_celsius(&mut self) -> Result<f32, Self::Error>;

    /// Temperature in degrees Fahrenheit.
    fn read_fahrenheit(&mut self) -> Result<f32, Self::Error>;
}

/// Raw analog input capability.
pub trait AnalogIn: Sensor {
    /// Latest conversion result as a raw code.
    fn read_data(&mut self) -> Result<u16, Self::Error>;

    /// Latest conversion result in volts.
    fn read_voltage(&mut self) -> Result<f32, Self::Error>;
}
