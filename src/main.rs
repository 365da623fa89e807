// SPDX-License-Identifier: Apache-2.0

use adi_sensors::interface::delay::TimerDelay;
use adi_sensors::interface::gpio::GpiodOut;
use adi_sensors::interface::i2cdev::I2cdevBus;
use adi_sensors::interface::spidev::SpidevBus;
use adi_sensors::{
    Ad5270, Ad7790Part, Adt7420, Cn0357, GasSensor, Sensor, TemperatureSensor,
};
use gpiod::Chip;
use std::{io, thread, time::Duration};

const SPI_DEVICE: &str = "/dev/spidev0.0";
const GPIO_CHIP: &str = "/dev/gpiochip0";
const RHEOSTAT_CS_PIN: u32 = 25;
const I2C_DEVICE: &str = "/dev/i2c-1";

fn main() -> io::Result<()> {
    let bus = SpidevBus::new(SPI_DEVICE)?;
    let chip = Chip::new(GPIO_CHIP)?;
    let cs = GpiodOut::new(&chip, RHEOSTAT_CS_PIN)?;
    let mut gas = Cn0357::new(bus, Ad5270::new(cs), Ad7790Part::new(TimerDelay));
    gas.open().expect("gas sensor open failed");
    gas.start().expect("gas sensor start failed");

    let i2c = I2cdevBus::new(I2C_DEVICE).expect("i2c open failed");
    let mut temp = Adt7420::new(i2c);
    temp.open().expect("temperature open failed");
    temp.start().expect("temperature start failed");

    loop {
        let ppm = gas.read_ppm().expect("gas read failed");
        let celsius = temp.read_celsius().expect("temperature read failed");
        println!("CO: {:.2} ppm  ambient: {:.2} C", ppm, celsius);
        thread::sleep(Duration::from_secs(1));
    }
}
