// SPDX-License-Identifier: Apache-2.0

//! Bus and board abstractions.
//!
//! Drivers talk to the hardware exclusively through the traits in this
//! module. The submodules provide Linux userspace backends (`spidev`,
//! `i2cdev`, `gpiod`) and a scripted mock layer for the behavioral tests.

pub mod delay;
pub mod gpio;
pub mod i2cdev;
pub mod mock;
pub mod spidev;

/// A single SPI bus transaction.
///
/// `tx` is clocked out first. When `read_after_write` is set, the `rx`
/// bytes are clocked in after the last `tx` byte with chip select held
/// across both phases. Otherwise the transfer is full duplex and `rx`
/// captures the bytes clocked in alongside `tx`, so `rx.len()` should
/// equal `tx.len()`.
pub struct SpiTransaction<'a> {
    pub tx: &'a [u8],
    pub rx: &'a mut [u8],
    pub read_after_write: bool,
}

impl<'a> SpiTransaction<'a> {
    /// Write `tx`, then clock `rx.len()` more bytes into `rx`.
    pub fn write_then_read(tx: &'a [u8], rx: &'a mut [u8]) -> Self {
        SpiTransaction {
            tx,
            rx,
            read_after_write: true,
        }
    }

    /// Full duplex; `rx` captures the bytes clocked in while `tx` goes out.
    pub fn full_duplex(tx: &'a [u8], rx: &'a mut [u8]) -> Self {
        SpiTransaction {
            tx,
            rx,
            read_after_write: false,
        }
    }

    /// Write `tx` and discard whatever comes back.
    pub fn write_only(tx: &'a [u8]) -> Self {
        SpiTransaction {
            tx,
            rx: &mut [],
            read_after_write: false,
        }
    }
}

/// Blocking SPI bus.
pub trait SpiBus {
    /// Error type
    type Error;

    /// Executes one transaction.
    fn transceive(&mut self, xfer: SpiTransaction<'_>) -> Result<(), Self::Error>;

    /// Enables or disables continuous transfer mode, where chip select
    /// stays asserted between the phases of a transaction.
    fn set_continuous(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

/// Blocking I2C bus.
pub trait I2cBus {
    /// Error type
    type Error;

    /// Writes `bytes` to the device at `addr`.
    fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Writes `tx` to the device at `addr`, then reads `rx.len()` bytes
    /// back from it.
    fn write_read(&mut self, addr: u16, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error>;
}
