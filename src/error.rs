//! Unified error types for the serial link layer.
//!
//! A single `Error` enum that every subsystem converts into, so callers
//! orchestrating a reconfiguration handle failures uniformly.  All variants
//! are `Copy` and carry no heap data.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The transport or link configuration is invalid.
    Config(ConfigError),
    /// An endpoint rejected an operation.
    Link(LinkError),
    /// RF modem command-mode negotiation failed.
    Modem(ModemError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Modem(e) => write!(f, "modem: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A secondary (or combined) mode was requested with no secondary channel.
    MissingSecondary,
    /// The autobaud probe order has no candidates.
    EmptyProbeOrder,
    /// The Bluetooth default speed is not one the module accepts.
    UnsupportedDefault(u32),
    /// Stored configuration could not be decoded.
    Decode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSecondary => write!(f, "secondary mode without a secondary channel"),
            Self::EmptyProbeOrder => write!(f, "probe order is empty"),
            Self::UnsupportedDefault(baud) => {
                write!(f, "{baud} is not a supported bluetooth default")
            }
            Self::Decode => write!(f, "stored config could not be decoded"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

/// Endpoint-level failures.
///
/// A fan-out write reports [`LinkError::WriteFailed`] without saying which
/// endpoint rejected the byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The endpoint is closed.
    NotOpen,
    /// At least one endpoint did not accept the byte.
    WriteFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen => write!(f, "endpoint not open"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Modem errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemError {
    /// No acknowledgment from the modem at any probed rate.
    NoAcknowledgment,
    /// The modem answered, but not with `OK` (strict acknowledgment only).
    AckMismatch,
}

impl fmt::Display for ModemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAcknowledgment => write!(f, "no acknowledgment from modem at any probed rate"),
            Self::AckMismatch => write!(f, "unexpected acknowledgment from modem"),
        }
    }
}

impl From<ModemError> for Error {
    fn from(e: ModemError) -> Self {
        Self::Modem(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
