//! Link configuration parameters
//!
//! All tunable timings and defaults for the serial link and the two device
//! reconfiguration protocols.  Values can be loaded from JSON or from a
//! postcard blob persisted by the embedding firmware.

use serde::{Deserialize, Serialize};

use crate::baud::{BaudRate, EXHAUSTIVE_PROBE_ORDER, FAST_PROBE_ORDER};
use crate::error::{ConfigError, Result};

/// Maximum number of autobaud candidates (one per enumerated rate).
pub const MAX_PROBE_CANDIDATES: usize = 8;

/// Core link configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub modem: ModemConfig,
    pub bluetooth: BluetoothConfig,
    /// Speed the primary channel is opened at to print diagnostics when no
    /// other speed is known.
    pub diagnostic_baud: u32,
}

/// RF modem autobaud and command-mode timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModemConfig {
    /// Wait after closing the link, covering the modem's boot after reset (ms)
    pub boot_settle_ms: u32,
    /// Wait after each `+++` guard before checking for a reply (ms)
    pub guard_settle_ms: u32,
    /// Wait after `ATWR` for the write to nonvolatile memory (ms)
    pub persist_settle_ms: u32,
    /// Wait after `ATCN` for the new speed to take effect (ms)
    pub exit_settle_ms: u32,
    /// Candidates tried, in order, when the modem ignores the target speed
    pub probe_order: heapless::Vec<BaudRate, MAX_PROBE_CANDIDATES>,
    /// Treat any acknowledgment other than `OK` as a failure
    pub require_ack: bool,
}

/// Bluetooth module command-mode timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BluetoothConfig {
    /// Speed the module ships at
    pub default_baud: BaudRate,
    /// Wait after the `$$$` guard before the rate command (ms)
    pub guard_settle_ms: u32,
}

/// Construction parameters for a secondary (pin-driven) serial channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryPins {
    pub rx: u8,
    pub tx: u8,
    pub inverse_logic: bool,
}

impl SecondaryPins {
    pub const fn new(rx: u8, tx: u8) -> Self {
        Self {
            rx,
            tx,
            inverse_logic: false,
        }
    }
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            boot_settle_ms: 1200,
            guard_settle_ms: 1200,
            persist_settle_ms: 1200,
            exit_settle_ms: 1200,
            probe_order: FAST_PROBE_ORDER.iter().copied().collect(),
            require_ack: false,
        }
    }
}

impl ModemConfig {
    /// Probe every rate the modem supports instead of the fast subset.
    pub fn exhaustive() -> Self {
        Self {
            probe_order: EXHAUSTIVE_PROBE_ORDER.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Upper bound on time spent probing (ms): boot wait plus one guard
    /// settle for the target and one per candidate.
    pub fn worst_case_probe_ms(&self) -> u64 {
        let probes = self.probe_order.len() as u64 + 1;
        u64::from(self.boot_settle_ms) + probes * u64::from(self.guard_settle_ms)
    }
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        Self {
            default_baud: BaudRate::B9600,
            guard_settle_ms: 100,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            modem: ModemConfig::default(),
            bluetooth: BluetoothConfig::default(),
            diagnostic_baud: 9600,
        }
    }
}

impl LinkConfig {
    /// Reject configurations the protocols cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.modem.probe_order.is_empty() {
            return Err(ConfigError::EmptyProbeOrder.into());
        }
        if self.bluetooth.default_baud.bluetooth_token().is_none() {
            return Err(ConfigError::UnsupportedDefault(self.bluetooth.default_baud.as_u32()).into());
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode for persistent storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Decode.into())
    }

    /// Decode and validate a blob produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}
