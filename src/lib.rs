//! Unified serial link library.
//!
//! A [`ChannelTransport`](serial::ChannelTransport) drives a primary and an
//! optional secondary serial endpoint as one link.  On top of it sit two
//! device reconfiguration protocols: RF modem autobaud and speed change
//! ([`modem`]), and Bluetooth module speed change ([`bluetooth`]).
//!
//! Protocol logic is pure and generic over [`Endpoint`](serial::Endpoint)
//! and `embedded_hal`'s `DelayNs`, so it runs unchanged against real UARTs
//! on ESP-IDF and against in-memory endpoints on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod baud;
pub mod bluetooth;
pub mod config;
pub mod diagnostics;
pub mod modem;
pub mod serial;

mod error;

pub use error::{ConfigError, Error, LinkError, ModemError, Result};
