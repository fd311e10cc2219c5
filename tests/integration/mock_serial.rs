//! Mock serial endpoints for integration tests.
//!
//! [`MockSerial`] records every open/close/flush and the text written at
//! each speed, and can simulate the device on the far side of the wire:
//! an RF modem (`+++` / `ATBD` / `ATCN`) or a Bluetooth module
//! (`$$$` / `U,<token>,N`).  Bytes sent at a speed other than the device's
//! current one are treated as line noise.

use uniserial::LinkError;
use uniserial::baud::RATE_TABLE;
use uniserial::serial::Endpoint;

use embedded_hal::delay::DelayNs;
use std::collections::VecDeque;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SerialCall {
    Open(u32),
    Close,
    Flush,
    /// Contiguous text written while open at `baud`.
    Text { baud: u32, text: String },
}

// ── Far-side device ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Nothing attached; writes are only recorded.
    Console,
    /// RF modem currently running at `baud`.
    RfModem { baud: u32 },
    /// Bluetooth module currently running at `baud`.
    Bluetooth { baud: u32 },
}

// ── MockSerial ────────────────────────────────────────────────

pub struct MockSerial {
    pub calls: Vec<SerialCall>,
    pub device: Device,
    /// Bytes the modem sends back for a guard it understood.
    pub ack: Vec<u8>,
    pub fail_writes: bool,
    open_baud: Option<u32>,
    rx: VecDeque<u8>,
    line: String,
    command_mode: bool,
    pending_modem_baud: Option<u32>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new(device: Device) -> Self {
        Self {
            calls: Vec::new(),
            device,
            ack: b"OK\r".to_vec(),
            fail_writes: false,
            open_baud: None,
            rx: VecDeque::new(),
            line: String::new(),
            command_mode: false,
            pending_modem_baud: None,
        }
    }

    pub fn console() -> Self {
        Self::new(Device::Console)
    }

    pub fn modem_at(baud: u32) -> Self {
        Self::new(Device::RfModem { baud })
    }

    pub fn bluetooth_at(baud: u32) -> Self {
        Self::new(Device::Bluetooth { baud })
    }

    pub fn with_ack(mut self, ack: &[u8]) -> Self {
        self.ack = ack.to_vec();
        self
    }

    /// Queue bytes as if received.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    pub fn open_baud(&self) -> Option<u32> {
        self.open_baud
    }

    /// Speed the far-side device is running at, if there is one.
    pub fn device_baud(&self) -> Option<u32> {
        match self.device {
            Device::Console => None,
            Device::RfModem { baud } | Device::Bluetooth { baud } => Some(baud),
        }
    }

    /// Open at the same speed as the device, so traffic gets through.
    pub fn in_sync(&self) -> bool {
        self.open_baud.is_some() && self.open_baud == self.device_baud()
    }

    /// Every speed this endpoint was opened at, in order.
    pub fn opens(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SerialCall::Open(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    /// All text written, concatenated.
    pub fn written(&self) -> String {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SerialCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text written while open at `baud`.
    pub fn written_at(&self, baud: u32) -> String {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SerialCall::Text { baud: b, text } if *b == baud => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn set_device_baud(&mut self, new: u32) {
        self.device = match self.device {
            Device::Console => Device::Console,
            Device::RfModem { .. } => Device::RfModem { baud: new },
            Device::Bluetooth { .. } => Device::Bluetooth { baud: new },
        };
    }

    fn record_byte(&mut self, baud: u32, byte: u8) {
        let ch = byte as char;
        if let Some(SerialCall::Text { baud: b, text }) = self.calls.last_mut() {
            if *b == baud {
                text.push(ch);
                return;
            }
        }
        self.calls.push(SerialCall::Text {
            baud,
            text: ch.to_string(),
        });
    }

    fn device_hears(&mut self, byte: u8) {
        if !self.in_sync() {
            return;
        }
        self.line.push(byte as char);
        match self.device {
            Device::Console => {}
            Device::RfModem { .. } => {
                if self.line.ends_with("+++") {
                    self.command_mode = true;
                    self.line.clear();
                    let ack = self.ack.clone();
                    self.rx.extend(ack);
                } else if self.line.ends_with("\r\n") {
                    let cmd = self.line.trim_end().to_string();
                    self.line.clear();
                    self.modem_command(&cmd);
                }
            }
            Device::Bluetooth { .. } => {
                if self.line.ends_with("$$$") {
                    self.command_mode = true;
                    self.line.clear();
                } else if self.line.ends_with("\r\n") {
                    let cmd = self.line.trim_end().to_string();
                    self.line.clear();
                    self.bluetooth_command(&cmd);
                }
            }
        }
    }

    fn modem_command(&mut self, cmd: &str) {
        if !self.command_mode {
            return;
        }
        if let Some(code) = cmd.strip_prefix("ATBD ") {
            self.pending_modem_baud = code
                .parse::<usize>()
                .ok()
                .and_then(|i| RATE_TABLE.get(i))
                .map(|e| e.rate.as_u32());
        } else if cmd == "ATCN" {
            self.command_mode = false;
            if let Some(baud) = self.pending_modem_baud.take() {
                self.set_device_baud(baud);
            }
        }
    }

    fn bluetooth_command(&mut self, cmd: &str) {
        if !self.command_mode {
            return;
        }
        let token = cmd
            .strip_prefix("U,")
            .and_then(|rest| rest.strip_suffix(",N"));
        let rate = RATE_TABLE
            .iter()
            .find(|e| e.bluetooth_token.is_some() && e.bluetooth_token == token)
            .map(|e| e.rate.as_u32());
        if let Some(baud) = rate {
            self.command_mode = false;
            self.set_device_baud(baud);
        }
    }
}

impl Endpoint for MockSerial {
    fn open(&mut self, baud: u32) {
        self.calls.push(SerialCall::Open(baud));
        self.open_baud = Some(baud);
        self.rx.clear();
        self.line.clear();
    }

    fn close(&mut self) {
        self.calls.push(SerialCall::Close);
        self.open_baud = None;
        self.rx.clear();
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
        let Some(baud) = self.open_baud else {
            return Err(LinkError::NotOpen);
        };
        if self.fail_writes {
            return Err(LinkError::WriteFailed);
        }
        self.record_byte(baud, byte);
        self.device_hears(byte);
        Ok(())
    }

    fn flush(&mut self) {
        self.calls.push(SerialCall::Flush);
    }
}

// ── RecordingDelay ────────────────────────────────────────────

/// Delay that returns immediately and remembers every request.
#[derive(Default)]
pub struct RecordingDelay {
    pub waits_ms: Vec<u32>,
}

#[allow(dead_code)]
impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.waits_ms.iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}
