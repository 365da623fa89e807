//! Scripted bus and pin doubles for the behavioral test suite.
//!
//! Each mock records the transactions issued against it and plays back
//! pre-programmed response bytes in order. Handles are `Clone` and share
//! their state through `Rc<RefCell<..>>`, so a test can keep inspecting
//! the log after moving the bus into a driver.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::gpio::OutputPin;
use super::{I2cBus, SpiBus, SpiTransaction};

/// Error type shared by all mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub &'static str);

/// One recorded SPI transaction. Failed transactions are logged with an
/// empty `rx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiRecord {
    pub tx: Vec<u8>,
    pub rx: Vec<u8>,
    pub read_after_write: bool,
}

#[derive(Default)]
struct SpiState {
    log: Vec<SpiRecord>,
    script: VecDeque<Result<Vec<u8>, MockError>>,
    fallback_rx_byte: u8,
    continuous: Vec<bool>,
}

/// Scripted SPI bus.
///
/// Every `transceive` consumes one script entry if any remain; once the
/// script runs dry, each response byte is `fallback_rx_byte`.
#[derive(Clone, Default)]
pub struct MockSpi {
    state: Rc<RefCell<SpiState>>,
}

impl MockSpi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the response bytes for the next transaction.
    pub fn push_rx(&self, bytes: &[u8]) {
        self.state
            .borrow_mut()
            .script
            .push_back(Ok(bytes.to_vec()));
    }

    /// Queues a transport failure for the next transaction.
    pub fn push_error(&self, err: MockError) {
        self.state.borrow_mut().script.push_back(Err(err));
    }

    /// Byte returned in every rx position once the script runs dry.
    pub fn set_fallback_rx_byte(&self, byte: u8) {
        self.state.borrow_mut().fallback_rx_byte = byte;
    }

    /// All transactions issued so far.
    pub fn log(&self) -> Vec<SpiRecord> {
        self.state.borrow().log.clone()
    }

    /// Arguments passed to `set_continuous`, in order.
    pub fn continuous_calls(&self) -> Vec<bool> {
        self.state.borrow().continuous.clone()
    }
}

impl SpiBus for MockSpi {
    type Error = MockError;

    fn transceive(&mut self, xfer: SpiTransaction<'_>) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let response = match state.script.pop_front() {
            Some(Ok(bytes)) => bytes,
            Some(Err(err)) => {
                state.log.push(SpiRecord {
                    tx: xfer.tx.to_vec(),
                    rx: Vec::new(),
                    read_after_write: xfer.read_after_write,
                });
                return Err(err);
            }
            None => vec![state.fallback_rx_byte; xfer.rx.len()],
        };
        for (dst, src) in xfer.rx.iter_mut().zip(response.iter()) {
            *dst = *src;
        }
        state.log.push(SpiRecord {
            tx: xfer.tx.to_vec(),
            rx: xfer.rx.to_vec(),
            read_after_write: xfer.read_after_write,
        });
        Ok(())
    }

    fn set_continuous(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.state.borrow_mut().continuous.push(enabled);
        Ok(())
    }
}

/// One recorded chip-select edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinEvent {
    Low,
    High,
}

#[derive(Default)]
struct PinLog {
    events: Vec<PinEvent>,
    fail_next: Option<MockError>,
}

/// Recording output pin.
#[derive(Clone, Default)]
pub struct MockPin {
    state: Rc<RefCell<PinLog>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next pin operation fail.
    pub fn fail_next(&self, err: MockError) {
        self.state.borrow_mut().fail_next = Some(err);
    }

    /// All edges driven so far.
    pub fn events(&self) -> Vec<PinEvent> {
        self.state.borrow().events.clone()
    }

    fn drive(&mut self, event: PinEvent) -> Result<(), MockError> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        state.events.push(event);
        Ok(())
    }
}

impl OutputPin for MockPin {
    type Error = MockError;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(PinEvent::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(PinEvent::High)
    }
}

/// One recorded I2C transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I2cRecord {
    pub addr: u16,
    pub tx: Vec<u8>,
    pub rx: Vec<u8>,
}

#[derive(Default)]
struct I2cState {
    log: Vec<I2cRecord>,
    script: VecDeque<Result<Vec<u8>, MockError>>,
}

/// Scripted I2C bus. Plain writes always succeed; `write_read` consumes
/// one script entry per call.
#[derive(Clone, Default)]
pub struct MockI2c {
    state: Rc<RefCell<I2cState>>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the response bytes for the next `write_read`.
    pub fn push_rx(&self, bytes: &[u8]) {
        self.state
            .borrow_mut()
            .script
            .push_back(Ok(bytes.to_vec()));
    }

    /// Queues a transport failure for the next `write_read`.
    pub fn push_error(&self, err: MockError) {
        self.state.borrow_mut().script.push_back(Err(err));
    }

    /// All transactions issued so far.
    pub fn log(&self) -> Vec<I2cRecord> {
        self.state.borrow().log.clone()
    }
}

impl I2cBus for MockI2c {
    type Error = MockError;

    fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Self::Error> {
        self.state.borrow_mut().log.push(I2cRecord {
            addr,
            tx: bytes.to_vec(),
            rx: Vec::new(),
        });
        Ok(())
    }

    fn write_read(&mut self, addr: u16, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let response = match state.script.pop_front() {
            Some(Ok(bytes)) => bytes,
            Some(Err(err)) => {
                state.log.push(I2cRecord {
                    addr,
                    tx: tx.to_vec(),
                    rx: Vec::new(),
                });
                return Err(err);
            }
            None => vec![0u8; rx.len()],
        };
        for (dst, src) in rx.iter_mut().zip(response.iter()) {
            *dst = *src;
        }
        state.log.push(I2cRecord {
            addr,
            tx: tx.to_vec(),
            rx: rx.to_vec(),
        });
        Ok(())
    }
}
