//! RF modem reconfiguration: autobaud, then reprogram the speed.
//!
//! The modem speaks an `AT` command set behind a `+++` guard.  Its current
//! speed is unknown, so [`negotiator`] finds it first and [`setter`] then
//! issues the speed change at that speed.  [`configure`] chains the two and
//! confirms the change on the console.

pub mod negotiator;
pub mod setter;

pub use negotiator::{AutobaudNegotiator, Confirmation, NegotiationResult, ProbeState};
pub use setter::apply_baud;

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::config::ModemConfig;
use crate::diagnostics::{self, Diagnostic};
use crate::error::Result;
use crate::serial::Endpoint;

/// Command-mode guard.
pub const GUARD: &str = "+++";
/// Expected reply to the guard.
pub const ACK: &str = "OK";
/// Set-speed command prefix; followed by the rate code.
pub const CMD_SET_BAUD: &str = "ATBD ";
/// Persist settings to nonvolatile memory.
pub const CMD_PERSIST: &str = "ATWR";
/// Leave command mode.
pub const CMD_EXIT: &str = "ATCN";

/// Find the modem's current speed on `link` and reprogram it to `target`.
///
/// On success the change is confirmed on `console`.  On failure nothing is
/// sent beyond the probes and `link` is left at the last probed speed.
/// Either way the caller must reopen `link` at the speed it wants.
pub fn configure<L, C, D>(
    link: &mut L,
    console: &mut C,
    target: u32,
    delay: &mut D,
    config: &ModemConfig,
) -> Result<Confirmation>
where
    L: Endpoint + ?Sized,
    C: Endpoint + ?Sized,
    D: DelayNs,
{
    let confirmation = AutobaudNegotiator::new(target, config).run(link, delay)?;
    if let Err(e) = apply_baud(link, &confirmation, target, delay, config) {
        warn!("MODEM | speed change partly unsent: {}", e);
    }
    diagnostics::report(console, &Diagnostic::ModemBaudSet { baud: target });
    Ok(confirmation)
}
