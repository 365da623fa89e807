// SPDX-License-Identifier: Apache-2.0

//! CN0357 carbon-monoxide gas sensor.
//!
//! The board carries an AD5270 digital rheostat (the electrochemical
//! cell's feedback resistor) and an AD7790 ADC on one SPI bus. The ADC
//! answers on the bus chip select; the rheostat hangs off its own GPIO
//! line and must be programmed and shut down before the ADC makes its
//! first transfer, because a powered-up rheostat loads the shared lines.
//!
//! The two stages sit behind the [`Rheostat`] and [`GasAdc`] traits so
//! the open ordering can be exercised with instrumented stand-ins.

use log::{debug, trace};

use crate::ad7790::Ad7790Part;
use crate::interface::delay::Delay;
use crate::interface::gpio::OutputPin;
use crate::interface::{SpiBus, SpiTransaction};
use crate::sensor::{GasSensor, Sensor, SensorState};
use crate::units::voltage_to_ppm;
use crate::Error;

/// Electrochemical cell sensitivity, amps per ppm of CO.
pub const SENSITIVITY: f32 = 6.5e-9;
/// Feedback resistance programmed into the rheostat, in ohms.
pub const FEEDBACK_OHMS: f32 = 9230.76;

/// End-to-end resistance of the AD5270-20, in ohms.
const RHEOSTAT_NOMINAL_OHMS: f32 = 20_000.0;
/// Wiper positions across the full resistance.
const RHEOSTAT_POSITIONS: f32 = 1024.0;

const CMD_NOOP: u16 = 0x0;
const CMD_WRITE_RDAC: u16 = 0x1;
const CMD_READ_RDAC: u16 = 0x2;
const CMD_WRITE_CTL: u16 = 0x7;
const CMD_SHUTDOWN: u16 = 0x9;

const CTL_ENABLE_RDAC: u16 = 2;
const CTL_ISSUE_SHUTDOWN: u16 = 1;
const CTL_ISSUE_NOOP: u16 = 0;

const DATA_MASK: u16 = 0x03FF;

/// Packs a command nibble and 10-bit data field into a 16-bit frame.
fn frame(cmd: u16, data: u16) -> [u8; 2] {
    ((cmd << 10) | (data & DATA_MASK)).to_be_bytes()
}

fn ohms_to_steps(ohms: f32) -> u16 {
    (ohms / RHEOSTAT_NOMINAL_OHMS * RHEOSTAT_POSITIONS) as u16
}

/// Rheostat stage of the composite. The production implementation is
/// [`Ad5270`].
pub trait Rheostat<B> {
    type Error;

    fn open(&mut self, bus: &mut B) -> Result<(), Self::Error>;

    /// Programs the wiper and verifies the read-back position.
    fn set_wiper(&mut self, bus: &mut B, ohms: f32) -> Result<(), Self::Error>;

    /// Shuts the stage down, releasing the shared bus lines.
    fn close(&mut self, bus: &mut B) -> Result<(), Self::Error>;
}

/// ADC stage of the composite. The production implementation is
/// [`Ad7790Part`].
pub trait GasAdc<B> {
    type Error;

    fn init(&mut self, bus: &mut B) -> Result<(), Self::Error>;
    fn read_voltage(&mut self, bus: &mut B) -> Result<f32, Self::Error>;
}

/// AD5270 digital rheostat behind its own chip-select line.
pub struct Ad5270<P> {
    cs: P,
}

impl<P, E> Ad5270<P>
where
    P: OutputPin<Error = E>,
{
    pub fn new(cs: P) -> Self {
        Ad5270 { cs }
    }

    // An error return mid-frame leaves chip select asserted.
    fn send<B>(&mut self, bus: &mut B, cmd: u16, data: u16) -> Result<(), Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        let tx = frame(cmd, data);
        self.cs.set_low().map_err(Error::Pin)?;
        bus.transceive(SpiTransaction::write_only(&tx))
            .map_err(Error::Comm)?;
        self.cs.set_high().map_err(Error::Pin)
    }

    fn receive<B>(&mut self, bus: &mut B, cmd: u16, data: u16) -> Result<u16, Error<E>>
    where
        B: SpiBus<Error = E>,
    {
        let tx = frame(cmd, data);
        let mut rx = [0u8; 2];
        self.cs.set_low().map_err(Error::Pin)?;
        bus.transceive(SpiTransaction::full_duplex(&tx, &mut rx))
            .map_err(Error::Comm)?;
        self.cs.set_high().map_err(Error::Pin)?;
        Ok(u16::from_be_bytes(rx))
    }
}

impl<P, B, E> Rheostat<B> for Ad5270<P>
where
    P: OutputPin<Error = E>,
    B: SpiBus<Error = E>,
{
    type Error = Error<E>;

    fn open(&mut self, bus: &mut B) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(Error::Pin)?;
        self.send(bus, CMD_WRITE_CTL, CTL_ENABLE_RDAC)
    }

    fn set_wiper(&mut self, bus: &mut B, ohms: f32) -> Result<(), Self::Error> {
        let steps = ohms_to_steps(ohms);
        self.send(bus, CMD_WRITE_RDAC, steps)?;
        let read = self.receive(bus, CMD_READ_RDAC, 0)? & DATA_MASK;
        if read != steps {
            return Err(Error::WiperMismatch { wrote: steps, read });
        }
        debug!("ad5270 wiper at {} steps ({} ohm)", steps, ohms);
        Ok(())
    }

    fn close(&mut self, bus: &mut B) -> Result<(), Self::Error> {
        self.send(bus, CMD_SHUTDOWN, CTL_ISSUE_SHUTDOWN)?;
        self.send(bus, CMD_NOOP, CTL_ISSUE_NOOP)
    }
}

impl<D, B, E> GasAdc<B> for Ad7790Part<D>
where
    D: Delay,
    B: SpiBus<Error = E>,
{
    type Error = Error<E>;

    fn init(&mut self, bus: &mut B) -> Result<(), Self::Error> {
        Ad7790Part::init(self, bus)
    }

    fn read_voltage(&mut self, bus: &mut B) -> Result<f32, Self::Error> {
        Ad7790Part::read_voltage(self, bus)
    }
}

/// CN0357 composite driver.
pub struct Cn0357<B, R, A> {
    bus: B,
    rheostat: R,
    adc: A,
    state: SensorState,
}

impl<B, R, A, E> Cn0357<B, R, A>
where
    B: SpiBus<Error = E>,
    R: Rheostat<B, Error = Error<E>>,
    A: GasAdc<B, Error = Error<E>>,
{
    pub fn new(bus: B, rheostat: R, adc: A) -> Self {
        Cn0357 {
            bus,
            rheostat,
            adc,
            state: SensorState::Unopened,
        }
    }
}

impl<B, R, A, E> Sensor for Cn0357<B, R, A>
where
    B: SpiBus<Error = E>,
    R: Rheostat<B, Error = Error<E>>,
    A: GasAdc<B, Error = Error<E>>,
{
    type Error = Error<E>;

    /// Brings the board up in the order the shared bus requires: the
    /// rheostat is programmed and shut down before the ADC makes its
    /// first transfer. A failure in any rheostat step aborts before the
    /// ADC is touched; earlier steps are not rolled back.
    fn open(&mut self) -> Result<(), Self::Error> {
        self.bus.set_continuous(true).map_err(Error::Comm)?;
        self.rheostat.open(&mut self.bus)?;
        self.rheostat.set_wiper(&mut self.bus, FEEDBACK_OHMS)?;
        self.rheostat.close(&mut self.bus)?;
        self.adc.init(&mut self.bus)?;
        debug!("cn0357 open complete");
        self.state = SensorState::Opened;
        Ok(())
    }

    // The ADC converts continuously once `open` has run; start and stop
    // only track the lifecycle.
    fn start(&mut self) -> Result<(), Self::Error> {
        self.state = SensorState::Started;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
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

impl<B, R, A, E> GasSensor for Cn0357<B, R, A>
where
    B: SpiBus<Error = E>,
    R: Rheostat<B, Error = Error<E>>,
    A: GasAdc<B, Error = Error<E>>,
{
    fn read_ppm(&mut self) -> Result<f32, Self::Error> {
        let voltage = self.adc.read_voltage(&mut self.bus)?;
        let ppm = voltage_to_ppm(voltage, FEEDBACK_OHMS, SENSITIVITY);
        trace!("cn0357 {:.4} V -> {:.2} ppm", voltage, ppm);
        Ok(ppm)
    }
}
