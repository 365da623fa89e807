use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use std::path::Path;

use super::I2cBus;

/// I2C bus backed by a Linux `/dev/i2c-N` device.
pub struct I2cdevBus {
    dev: LinuxI2CDevice,
}

impl I2cdevBus {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<I2cdevBus, LinuxI2CError> {
        // The slave address is selected per transaction.
        let dev = LinuxI2CDevice::new(path, 0)?;
        Ok(I2cdevBus { dev })
    }
}

impl I2cBus for I2cdevBus {
    type Error = LinuxI2CError;

    fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Self::Error> {
        self.dev.set_slave_address(addr)?;
        self.dev.write(bytes)
    }

    fn write_read(&mut self, addr: u16, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        self.dev.set_slave_address(addr)?;
        self.dev.write(tx)?;
        self.dev.read(rx)
    }
}
