// SPDX-License-Identifier: Apache-2.0

//! AD7790 16-bit sigma-delta ADC (SPI).
//!
//! The chip keeps separate read and write address spaces inside its
//! communications register, so [`ReadRegister`] and [`WriteRegister`]
//! stay disjoint enums. Mode and filter writes are verified by reading
//! the register back.
//!
//! [`Ad7790Part`] carries the register protocol against a borrowed bus,
//! so the chip can share its SPI lines with another part (see
//! [`crate::cn0357`]). [`Ad7790`] wraps a part and an owned bus into a
//! standalone sensor.

use log::{debug, trace, warn};

use crate::interface::delay::Delay;
use crate::interface::{SpiBus, SpiTransaction};
use crate::sensor::{AnalogIn, Sensor, SensorState};
use crate::units::adc_code_to_voltage;
use crate::Error;

/// Reference voltage in volts.
pub const VREF: f32 = 1.2;
/// Input amplifier gain.
pub const GAIN: f32 = 1.0;
/// Conversion width in bits.
pub const DATA_WIDTH: u8 = 16;

const STATUS_NOT_READY: u8 = 0x80;
const RESET_BYTE: u8 = 0xFF;
const POLL_DELAY_US: u32 = 100;

/// Status reads allowed before a data read gives up.
const MAX_STATUS_READS: usize = 1000;

/// Registers readable through the communications register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRegister {
    Status = 0x08,
    Mode = 0x18,
    Filter = 0x28,
    Data = 0x38,
}

/// Registers writable through the communications register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteRegister {
    Mode = 0x10,
    Filter = 0x20,
}

/// Conversion mode select field of the mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    Continuous = 0,
    Single = 2,
    PowerDown = 3,
}

/// Analog input range as a fraction of the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoltageRange {
    Full = 0,
    Half = 1,
    Quarter = 2,
    Eighth = 3,
}

/// Modulator clock divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockDivider {
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
}

/// Output word rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordRate {
    Hz120 = 0,
    Hz100 = 1,
    Hz33_3 = 2,
    Hz20 = 3,
    Hz16_6 = 4,
    Hz16_7 = 5,
    Hz13_3 = 6,
    Hz9_5 = 7,
}

/// ADC configuration, programmed by `init`.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub range: VoltageRange,
    pub burnout: bool,
    pub buffered: bool,
    pub clock_divider: ClockDivider,
    pub word_rate: WordRate,
}

impl Default for Config {
    fn default() -> Self {
        // Power-on defaults: buffered input, full range, 9.5 Hz word rate.
        Config {
            range: VoltageRange::Full,
            burnout: false,
            buffered: true,
            clock_divider: ClockDivider::Div1,
            word_rate: WordRate::Hz9_5,
        }
    }
}

fn mode_byte(mode: ConversionMode, config: Config) -> u8 {
    ((mode as u8) << 5)
        | ((config.range as u8) << 3)
        | ((config.burnout as u8) << 2)
        | ((config.buffered as u8) << 1)
}

fn filter_byte(config: Config) -> u8 {
    ((config.clock_divider as u8) << 3) | config.word_rate as u8
}

/// The AD7790 register protocol over a borrowed bus.
pub struct Ad7790Part<D> {
    delay: D,
    config: Config,
}

impl<D: Delay> Ad7790Part<D> {
    pub fn new(delay: D) -> Self {
        Self::with_config(delay, Config::default())
    }

    pub fn with_config(delay: D, config: Config) -> Self {
        Ad7790Part { delay, config }
    }

    /// Clocks out 32 ones, returning the serial interface to a known
    /// state.
    pub fn reset<B, E>(&mut self, bus: &mut B) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        let tx = [RESET_BYTE; 4];
        bus.transceive(SpiTransaction::write_only(&tx))
            .map_err(Error::Comm)?;
        trace!("ad7790 interface reset");
        Ok(())
    }

    pub fn read_register<B, E>(&mut self, bus: &mut B, reg: ReadRegister) -> Result<u8, Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        let tx = [reg as u8];
        let mut rx = [0u8; 1];
        bus.transceive(SpiTransaction::write_then_read(&tx, &mut rx))
            .map_err(Error::Comm)?;
        trace!("ad7790 read {:?} -> 0x{:02X}", reg, rx[0]);
        Ok(rx[0])
    }

    pub fn write_register<B, E>(
        &mut self,
        bus: &mut B,
        reg: WriteRegister,
        value: u8,
    ) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        let tx = [reg as u8, value];
        bus.transceive(SpiTransaction::write_only(&tx))
            .map_err(Error::Comm)?;
        trace!("ad7790 write {:?} <- 0x{:02X}", reg, value);
        Ok(())
    }

    /// Writes the mode register and verifies the read-back.
    pub fn write_mode<B, E>(&mut self, bus: &mut B, value: u8) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        self.write_register(bus, WriteRegister::Mode, value)?;
        let read = self.read_register(bus, ReadRegister::Mode)?;
        if read != value {
            return Err(Error::ModeMismatch { wrote: value, read });
        }
        Ok(())
    }

    /// Writes the filter register and verifies the read-back.
    pub fn write_filter<B, E>(&mut self, bus: &mut B, value: u8) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        self.write_register(bus, WriteRegister::Filter, value)?;
        let read = self.read_register(bus, ReadRegister::Filter)?;
        if read != value {
            return Err(Error::FilterMismatch { wrote: value, read });
        }
        Ok(())
    }

    /// Resets the part and programs the configured mode and filter.
    pub fn init<B, E>(&mut self, bus: &mut B) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        self.reset(bus)?;
        self.write_mode(bus, mode_byte(ConversionMode::Continuous, self.config))?;
        self.write_filter(bus, filter_byte(self.config))?;
        debug!("ad7790 configured");
        Ok(())
    }

    /// Polls the status register until a conversion completes.
    ///
    /// A failed status read propagates immediately. Running out of the
    /// poll budget yields `DataReadyTimeout` without touching the data
    /// register.
    pub fn wait_data_ready<B, E>(&mut self, bus: &mut B) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        let mut reads = 0;
        loop {
            let status = self.read_register(bus, ReadRegister::Status)?;
            reads += 1;
            if reads == MAX_STATUS_READS {
                warn!(
                    "ad7790 conversion never completed after {} status reads",
                    MAX_STATUS_READS
                );
                return Err(Error::DataReadyTimeout);
            }
            if status & STATUS_NOT_READY == 0 {
                return Ok(());
            }
            self.delay.delay_us(POLL_DELAY_US);
        }
    }

    /// Waits for a conversion, then reads the 16-bit result (MSB first).
    pub fn read_data<B, E>(&mut self, bus: &mut B) -> Result<u16, Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        self.wait_data_ready(bus)?;
        let tx = [ReadRegister::Data as u8];
        let mut rx = [0u8; 2];
        bus.transceive(SpiTransaction::write_then_read(&tx, &mut rx))
            .map_err(Error::Comm)?;
        Ok(u16::from_be_bytes(rx))
    }

    /// Waits for a conversion, then reads the result in volts.
    pub fn read_voltage<B, E>(&mut self, bus: &mut B) -> Result<f32, Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        let code = self.read_data(bus)?;
        Ok(adc_code_to_voltage(code, DATA_WIDTH, VREF, GAIN))
    }

    /// Powers the modulator down.
    pub fn power_down<B, E>(&mut self, bus: &mut B) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        self.write_mode(bus, mode_byte(ConversionMode::PowerDown, self.config))
    }
}

/// Standalone AD7790 with exclusive ownership of its bus.
pub struct Ad7790<B, D> {
    bus: B,
    part: Ad7790Part<D>,
    state: SensorState,
}

impl<B, D, E> Ad7790<B, D>
where
    B: SpiBus<Error = E>,
    D: Delay,
{
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_config(bus, delay, Config::default())
    }

    pub fn with_config(bus: B, delay: D, config: Config) -> Self {
        Ad7790 {
            bus,
            part: Ad7790Part::with_config(delay, config),
            state: SensorState::Unopened,
        }
    }
}

impl<B, D, E> Sensor for Ad7790<B, D>
where
    B: SpiBus<Error = E>,
    D: Delay,
{
    type Error = Error<E>;

    fn open(&mut self) -> Result<(), Self::Error> {
        self.part.init(&mut self.bus)?;
        self.state = SensorState::Opened;
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        let byte = mode_byte(ConversionMode::Continuous, self.part.config);
        self.part.write_mode(&mut self.bus, byte)?;
        self.state = SensorState::Started;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.part.power_down(&mut self.bus)?;
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

impl<B, D, E> AnalogIn for Ad7790<B, D>
where
    B: SpiBus<Error = E>,
    D: Delay,
{
    fn read_data(&mut self) -> Result<u16, Self::Error> {
        self.part.read_data(&mut self.bus)
    }

    fn read_voltage(&mut self) -> Result<f32, Self::Error> {
        self.part.read_voltage(&mut self.bus)
    }
}
