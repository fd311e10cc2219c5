//! UART endpoint adapter.
//!
//! - **`target_os = "espidf"`**: wraps an `esp_idf_hal` [`UartDriver`]:
//!   `open` changes the baud rate and clears stale input, `peek` is served
//!   from a one-byte look-ahead buffer.
//! - **`not(target_os = "espidf")`**: an in-memory endpoint for host-side
//!   testing and simulation: received bytes are injected, transmitted bytes
//!   are captured.
//!
//! [`UartDriver`]: esp_idf_hal::uart::UartDriver

use crate::error::LinkError;
use crate::serial::Endpoint;

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    delay::{BLOCK, NON_BLOCK},
    uart::UartDriver,
    units::Hertz,
};

/// Serial endpoint over a hardware UART.
#[cfg(target_os = "espidf")]
pub struct UartEndpoint {
    driver: UartDriver<'static>,
    peeked: Option<u8>,
    open: bool,
}

#[cfg(target_os = "espidf")]
impl UartEndpoint {
    pub fn new(driver: UartDriver<'static>) -> Self {
        Self {
            driver,
            peeked: None,
            open: false,
        }
    }

    fn fetch(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.driver.read(&mut buf, NON_BLOCK) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

#[cfg(target_os = "espidf")]
impl Endpoint for UartEndpoint {
    fn open(&mut self, baud: u32) {
        if let Err(e) = self.driver.change_baudrate(Hertz(baud)) {
            log::warn!("UART | baud change to {} failed: {}", baud, e);
        }
        let _ = self.driver.clear_rx();
        self.peeked = None;
        self.open = true;
    }

    fn close(&mut self) {
        if self.open {
            let _ = self.driver.wait_tx_done(BLOCK);
        }
        self.peeked = None;
        self.open = false;
    }

    fn read(&mut self) -> Option<u8> {
        if !self.open {
            return None;
        }
        self.peeked.take().or_else(|| self.fetch())
    }

    fn peek(&mut self) -> Option<u8> {
        if !self.open {
            return None;
        }
        if self.peeked.is_none() {
            self.peeked = self.fetch();
        }
        self.peeked
    }

    fn available(&self) -> usize {
        if !self.open {
            return 0;
        }
        let pending = self.driver.remaining_read().unwrap_or(0);
        pending + usize::from(self.peeked.is_some())
    }

    fn write(&mut self, byte: u8) -> Result<(), LinkError> {
        if !self.open {
            return Err(LinkError::NotOpen);
        }
        match self.driver.write(&[byte]) {
            Ok(1) => Ok(()),
            _ => Err(LinkError::WriteFailed),
        }
    }

    fn flush(&mut self) {
        let _ = self.driver.wait_tx_done(BLOCK);
    }
}

// ── Host simulation ───────────────────────────────────────────

/// In-memory serial endpoint.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct UartEndpoint {
    baud: Option<u32>,
    rx: std::collections::VecDeque<u8>,
    tx: Vec<u8>,
    reject_writes: bool,
}

#[cfg(not(target_os = "espidf"))]
impl UartEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current speed, `None` while closed.
    pub fn baud(&self) -> Option<u32> {
        self.baud
    }

    pub fn is_open(&self) -> bool {
        self.baud.is_some()
    }

    /// Queue bytes as if received from the wire.  Dropped while closed.
    pub fn inject(&mut self, bytes: &[u8]) {
        if self.is_open() {
            self.rx.extend(bytes);
        }
    }

    /// Everything transmitted since construction.
    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }

    /// Simulate a line fault: every write fails until cleared.
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }
}

#[cfg(not(target_os = "espidf"))]
impl Endpoint for UartEndpoint {
    fn open(&mut self, baud: u32) {
        self.rx.clear();
        self.baud = Some(baud);
    }

    fn close(&mut self) {
        self.rx.clear();
        self.baud = None;
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn peek(&mut self) -> Option<u8> {
        self.rx.front().copied()
    }

    fn available(&self) -> usize {
        self.rx.len()
    }

    fn write(&mut self, byte: u8) -> Result<(), LinkError> {
        if !self.is_open() {
            return Err(LinkError::NotOpen);
        }
        if self.reject_writes {
            return Err(LinkError::WriteFailed);
        }
        self.tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) {}
}
