// SPDX-License-Identifier: Apache-2.0

//! Hardware integration tests.
//!
//! These tests require a CN0357 gas-sensor shield, an ADXL362 and an
//! ADT7420 wired to the paths below, and are marked with #[ignore].
//! Run with: RUST_LOG=debug cargo test -- --ignored --test-threads=1

use adi_sensors::interface::delay::TimerDelay;
use adi_sensors::interface::gpio::GpiodOut;
use adi_sensors::interface::i2cdev::I2cdevBus;
use adi_sensors::interface::spidev::SpidevBus;
use adi_sensors::{
    Accelerometer, Ad5270, Ad7790Part, Adt7420, Adxl362, Cn0357, GasSensor, Sensor,
    TemperatureSensor,
};
use gpiod::Chip;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logger for tests (only once)
fn init_logger() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

const TEST_ACCEL_SPI_DEVICE: &str = "/dev/spidev0.1";
const TEST_GAS_SPI_DEVICE: &str = "/dev/spidev0.0";
const TEST_GPIO_CHIP: &str = "/dev/gpiochip0";
const TEST_RHEOSTAT_CS_PIN: u32 = 25;
const TEST_I2C_DEVICE: &str = "/dev/i2c-1";

#[test]
#[ignore]
fn test_accelerometer_bring_up_and_read() {
    init_logger();

    let bus = SpidevBus::new(TEST_ACCEL_SPI_DEVICE).expect("Failed to open SPI device");
    let mut accel = Adxl362::new(bus, TimerDelay);

    accel.open().expect("Failed to verify accelerometer identity");
    accel.start().expect("Failed to enter measurement mode");

    let mut xyz = [0u8; 6];
    accel.read_xyz(&mut xyz).expect("Failed to read sample");

    // A stationary part should see roughly 1 g on one axis. Samples are
    // 12-bit signed at 1 mg/LSB in the +/-2 g range.
    let x = i16::from_le_bytes([xyz[0], xyz[1]]);
    let y = i16::from_le_bytes([xyz[2], xyz[3]]);
    let z = i16::from_le_bytes([xyz[4], xyz[5]]);
    let magnitude = ((x as f32).powi(2) + (y as f32).powi(2) + (z as f32).powi(2)).sqrt();
    assert!(
        magnitude > 800.0 && magnitude < 1200.0,
        "acceleration magnitude {} outside expected range",
        magnitude
    );

    accel.stop().expect("Failed to enter standby");
    println!("✓ Accelerometer: [{}, {}, {}] mg", x, y, z);
}

#[test]
#[ignore]
fn test_gas_sensor_bring_up_and_read() {
    init_logger();

    let bus = SpidevBus::new(TEST_GAS_SPI_DEVICE).expect("Failed to open SPI device");
    let chip = Chip::new(TEST_GPIO_CHIP).expect("Failed to open GPIO chip");
    let cs = GpiodOut::new(&chip, TEST_RHEOSTAT_CS_PIN).expect("Failed to request CS line");

    let mut gas = Cn0357::new(bus, Ad5270::new(cs), Ad7790Part::new(TimerDelay));
    gas.open().expect("Failed to bring up gas sensor");
    gas.start().expect("Failed to start gas sensor");

    let ppm = gas.read_ppm().expect("Failed to read concentration");
    // Clean air carries well under 10 ppm of CO.
    assert!(ppm < 50.0, "CO concentration {} unexpectedly high", ppm);

    println!("✓ Gas sensor: {:.2} ppm CO", ppm);
}

#[test]
#[ignore]
fn test_temperature_bring_up_and_read() {
    init_logger();

    let bus = I2cdevBus::new(TEST_I2C_DEVICE).expect("Failed to open I2C device");
    let mut temp = Adt7420::new(bus);

    temp.open().expect("Failed to open temperature sensor");
    temp.start().expect("Failed to start conversions");

    let celsius = temp.read_celsius().expect("Failed to read temperature");
    assert!(
        celsius > -10.0 && celsius < 50.0,
        "ambient temperature {} outside expected range",
        celsius
    );

    let fahrenheit = temp.read_fahrenheit().expect("Failed to read temperature");
    assert!((fahrenheit - (celsius * 9.0 / 5.0 + 32.0)).abs() < 1.0);

    temp.stop().expect("Failed to shut the part down");
    println!("✓ Temperature: {:.2} C / {:.2} F", celsius, fahrenheit);
}
