//! Enumerated baud rates and the rate table shared by both device families.
//!
//! One ordered table maps each [`BaudRate`] to its RF modem `ATBD` code and
//! (where the Bluetooth module supports it) its `U,<token>,N` token.  The
//! negotiator, the baud setter and the Bluetooth reconfigurator all read
//! from [`RATE_TABLE`]; nothing else carries rate literals.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A serial speed from the fixed set either device family understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum BaudRate {
    B1200 = 1200,
    B2400 = 2400,
    B4800 = 4800,
    B9600 = 9600,
    B19200 = 19200,
    B38400 = 38400,
    B57600 = 57600,
    B115200 = 115_200,
}

/// One row of the rate table.
#[derive(Debug, Clone, Copy)]
pub struct RateEntry {
    pub rate: BaudRate,
    /// Argument to the modem's `ATBD` command.
    pub modem_code: u8,
    /// Rate token for the Bluetooth `U,<token>,N` command, if supported.
    pub bluetooth_token: Option<&'static str>,
}

/// Every supported rate, slowest first.
pub const RATE_TABLE: [RateEntry; 8] = [
    RateEntry { rate: BaudRate::B1200, modem_code: 0, bluetooth_token: Some("1200") },
    RateEntry { rate: BaudRate::B2400, modem_code: 1, bluetooth_token: Some("2400") },
    RateEntry { rate: BaudRate::B4800, modem_code: 2, bluetooth_token: Some("4800") },
    RateEntry { rate: BaudRate::B9600, modem_code: 3, bluetooth_token: Some("9600") },
    RateEntry { rate: BaudRate::B19200, modem_code: 4, bluetooth_token: Some("192K") },
    RateEntry { rate: BaudRate::B38400, modem_code: 5, bluetooth_token: Some("384K") },
    RateEntry { rate: BaudRate::B57600, modem_code: 6, bluetooth_token: Some("576K") },
    RateEntry { rate: BaudRate::B115200, modem_code: 7, bluetooth_token: None },
];

/// Code sent for targets outside the table: the fastest rate a
/// software-emulated channel handles reliably.
pub const MODEM_FALLBACK: BaudRate = BaudRate::B57600;

/// Most-likely-first probe order used on boot.
pub const FAST_PROBE_ORDER: [BaudRate; 5] = [
    BaudRate::B9600,
    BaudRate::B57600,
    BaudRate::B115200,
    BaudRate::B19200,
    BaudRate::B38400,
];

/// Every rate the modem hardware supports, in rough order of popularity.
pub const EXHAUSTIVE_PROBE_ORDER: [BaudRate; 8] = [
    BaudRate::B9600,
    BaudRate::B19200,
    BaudRate::B38400,
    BaudRate::B57600,
    BaudRate::B115200,
    BaudRate::B4800,
    BaudRate::B2400,
    BaudRate::B1200,
];

impl BaudRate {
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Look up an enumerated rate.  `None` for anything outside the table.
    pub fn from_u32(baud: u32) -> Option<Self> {
        RATE_TABLE
            .iter()
            .find(|e| e.rate.as_u32() == baud)
            .map(|e| e.rate)
    }

    /// Row index in [`RATE_TABLE`].
    const fn index(self) -> usize {
        match self {
            Self::B1200 => 0,
            Self::B2400 => 1,
            Self::B4800 => 2,
            Self::B9600 => 3,
            Self::B19200 => 4,
            Self::B38400 => 5,
            Self::B57600 => 6,
            Self::B115200 => 7,
        }
    }

    fn entry(self) -> &'static RateEntry {
        &RATE_TABLE[self.index()]
    }

    pub fn modem_code(self) -> u8 {
        self.entry().modem_code
    }

    pub fn bluetooth_token(self) -> Option<&'static str> {
        self.entry().bluetooth_token
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> Self {
        rate.as_u32()
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = UnknownBaud;

    fn try_from(baud: u32) -> Result<Self, Self::Error> {
        Self::from_u32(baud).ok_or(UnknownBaud(baud))
    }
}

/// A speed outside the enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownBaud(pub u32);

impl fmt::Display for UnknownBaud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not an enumerated baud rate", self.0)
    }
}

/// `ATBD` code for a requested target.  Unknown targets get the
/// [`MODEM_FALLBACK`] code instead of an error.
pub fn modem_code_for(baud: u32) -> u8 {
    BaudRate::from_u32(baud).map_or(MODEM_FALLBACK.modem_code(), BaudRate::modem_code)
}

/// Bluetooth rate token for a requested target, if the module supports it.
pub fn bluetooth_token_for(baud: u32) -> Option<&'static str> {
    BaudRate::from_u32(baud).and_then(BaudRate::bluetooth_token)
}

/// Rates the Bluetooth module accepts, slowest first.
pub fn bluetooth_rates() -> impl Iterator<Item = BaudRate> {
    RATE_TABLE
        .iter()
        .filter(|e| e.bluetooth_token.is_some())
        .map(|e| e.rate)
}
