use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use std::io;
use std::path::Path;

use super::{SpiBus, SpiTransaction};

/// SPI bus backed by a Linux `/dev/spidevX.Y` device.
pub struct SpidevBus {
    spi: Spidev,
}

impl SpidevBus {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<SpidevBus> {
        let mut spi = Spidev::open(path)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(1_000_000)
            .mode(SpiModeFlags::SPI_MODE_3)
            .lsb_first(false)
            .build();
        spi.configure(&options)?;

        Ok(SpidevBus { spi })
    }
}

impl SpiBus for SpidevBus {
    type Error = io::Error;

    fn transceive(&mut self, xfer: SpiTransaction<'_>) -> Result<(), Self::Error> {
        if xfer.read_after_write {
            // Both halves run inside one ioctl, so chip select stays
            // asserted between the write and the read.
            let mut transfers = [
                SpidevTransfer::write(xfer.tx),
                SpidevTransfer::read(xfer.rx),
            ];
            self.spi.transfer_multiple(&mut transfers)?;
        } else if xfer.rx.is_empty() {
            let mut transfer = SpidevTransfer::write(xfer.tx);
            self.spi.transfer(&mut transfer)?;
        } else {
            let mut transfer = SpidevTransfer::read_write(xfer.tx, xfer.rx);
            self.spi.transfer(&mut transfer)?;
        }
        Ok(())
    }

    fn set_continuous(&mut self, _enabled: bool) -> Result<(), Self::Error> {
        // The kernel asserts chip select for the duration of each ioctl;
        // there is nothing to reconfigure on this backend.
        Ok(())
    }
}
