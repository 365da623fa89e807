// SPDX-License-Identifier: Apache-2.0

//! ADXL362 micropower 3-axis accelerometer (SPI).
//!
//! Every register access is a command-prefixed frame: `0x0A` for writes,
//! `0x0B` for reads. `open` verifies the three identity registers before
//! anything else touches the part; `start` drops it into measurement mode
//! and applies the configured range and output data rate.

use log::{debug, trace, warn};

use crate::interface::delay::Delay;
use crate::interface::{SpiBus, SpiTransaction};
use crate::sensor::{Accelerometer, Sensor, SensorState};
use crate::Error;

const CMD_WRITE: u8 = 0x0A;
const CMD_READ: u8 = 0x0B;

const REG_DEVID_AD: u8 = 0x00;
const REG_DEVID_MST: u8 = 0x01;
const REG_PARTID: u8 = 0x02;
const REG_STATUS: u8 = 0x0B;
const REG_XDATA_L: u8 = 0x0E;
const REG_YDATA_L: u8 = 0x10;
const REG_ZDATA_L: u8 = 0x12;
const REG_ZDATA_H: u8 = 0x13;
const REG_SOFT_RESET: u8 = 0x1F;
const REG_FILTER_CTL: u8 = 0x2C;
const REG_POWER_CTL: u8 = 0x2D;

const DEVID_AD: u8 = 0xAD;
const DEVID_MST: u8 = 0x1D;
const PARTID: u8 = 0xF2;

const SOFT_RESET_KEY: u8 = 0x52;
const POWER_CTL_MEASURE: u8 = 0x02;
const POWER_CTL_STANDBY: u8 = 0x00;
const STATUS_DATA_READY: u8 = 0x01;

/// Status reads allowed before a sample read gives up.
const MAX_STATUS_READS: usize = 10;

/// Measurement range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    G2 = 0,
    G4 = 1,
    G8 = 2,
}

/// Output data rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDataRate {
    Hz12_5 = 0,
    Hz25 = 1,
    Hz50 = 2,
    Hz100 = 3,
    Hz200 = 4,
    Hz400 = 5,
}

/// Accelerometer configuration, applied by `start`.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub range: Range,
    pub odr: OutputDataRate,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            range: Range::G2,
            odr: OutputDataRate::Hz100,
        }
    }
}

fn filter_ctl_byte(config: Config) -> u8 {
    ((config.range as u8) << 6) | config.odr as u8
}

/// ADXL362 driver with exclusive ownership of its bus.
pub struct Adxl362<B, D> {
    bus: B,
    delay: D,
    config: Config,
    state: SensorState,
}

impl<B, D, E> Adxl362<B, D>
where
    B: SpiBus<Error = E>,
    D: Delay,
{
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_config(bus, delay, Config::default())
    }

    pub fn with_config(bus: B, delay: D, config: Config) -> Self {
        Adxl362 {
            bus,
            delay,
            config,
            state: SensorState::Unopened,
        }
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let tx = [CMD_READ, reg];
        let mut rx = [0u8; 1];
        self.bus
            .transceive(SpiTransaction::write_then_read(&tx, &mut rx))
            .map_err(Error::Comm)?;
        trace!("adxl362 read 0x{:02X} -> 0x{:02X}", reg, rx[0]);
        Ok(rx[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        let tx = [CMD_WRITE, reg, value];
        let mut rx = [0u8; 3];
        self.bus
            .transceive(SpiTransaction::full_duplex(&tx, &mut rx))
            .map_err(Error::Comm)?;
        trace!("adxl362 write 0x{:02X} <- 0x{:02X}", reg, value);
        Ok(())
    }

    /// Resets the part to its power-on state.
    pub fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.write_register(REG_SOFT_RESET, SOFT_RESET_KEY)?;
        self.delay.delay_ms(1);
        Ok(())
    }

    /// Polls the status register until a sample is flagged as ready.
    ///
    /// A failed status read counts as "not ready" and polling continues.
    /// Running out of the poll budget yields `DataReadyTimeout` without
    /// touching the data registers.
    fn wait_data_ready(&mut self) -> Result<(), Error<E>> {
        for _ in 0..MAX_STATUS_READS {
            match self.read_register(REG_STATUS) {
                Ok(status) if status & STATUS_DATA_READY != 0 => return Ok(()),
                Ok(_) | Err(_) => {}
            }
        }
        warn!(
            "adxl362 no sample ready after {} status reads",
            MAX_STATUS_READS
        );
        Err(Error::DataReadyTimeout)
    }

    fn read_axis(&mut self, low_reg: u8, buf: &mut [u8; 2]) -> Result<(), Error<E>> {
        self.wait_data_ready()?;
        buf[0] = self.read_register(low_reg)?;
        buf[1] = self.read_register(low_reg + 1)?;
        Ok(())
    }
}

impl<B, D, E> Sensor for Adxl362<B, D>
where
    B: SpiBus<Error = E>,
    D: Delay,
{
    type Error = Error<E>;

    fn open(&mut self) -> Result<(), Self::Error> {
        let devid = self.read_register(REG_DEVID_AD)?;
        if devid != DEVID_AD {
            return Err(Error::InvalidDeviceId(devid));
        }
        let memsid = self.read_register(REG_DEVID_MST)?;
        if memsid != DEVID_MST {
            return Err(Error::InvalidMemsId(memsid));
        }
        let partid = self.read_register(REG_PARTID)?;
        if partid != PARTID {
            return Err(Error::InvalidPartId(partid));
        }
        debug!("adxl362 identity verified");
        self.state = SensorState::Opened;
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.write_register(REG_POWER_CTL, POWER_CTL_MEASURE)?;
        self.write_register(REG_FILTER_CTL, filter_ctl_byte(self.config))?;
        debug!(
            "adxl362 measuring, range {:?} at {:?}",
            self.config.range, self.config.odr
        );
        self.state = SensorState::Started;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.write_register(REG_POWER_CTL, POWER_CTL_STANDBY)?;
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

impl<B, D, E> Accelerometer for Adxl362<B, D>
where
    B: SpiBus<Error = E>,
    D: Delay,
{
    fn read_x(&mut self, buf: &mut [u8; 2]) -> Result<(), Self::Error> {
        self.read_axis(REG_XDATA_L, buf)
    }

    fn read_y(&mut self, buf: &mut [u8; 2]) -> Result<(), Self::Error> {
        self.read_axis(REG_YDATA_L, buf)
    }

    fn read_z(&mut self, buf: &mut [u8; 2]) -> Result<(), Self::Error> {
        self.read_axis(REG_ZDATA_L, buf)
    }

    fn read_xyz(&mut self, buf: &mut [u8; 6]) -> Result<(), Self::Error> {
        self.wait_data_ready()?;
        for (slot, reg) in buf.iter_mut().zip(REG_XDATA_L..=REG_ZDATA_H) {
            *slot = self.read_register(reg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_ctl_packs_range_and_rate() {
        let byte = filter_ctl_byte(Config {
            range: Range::G8,
            odr: OutputDataRate::Hz400,
        });
        assert_eq!(byte, 0b1000_0101);

        let byte = filter_ctl_byte(Config::default());
        assert_eq!(byte, 0b0000_0011);
    }
}
