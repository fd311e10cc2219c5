//! Human-readable diagnostics on the primary channel.
//!
//! The primary endpoint doubles as the operator console.  Each
//! [`Diagnostic`] renders to one or more plain text lines which are
//! written there with CR LF endings and mirrored to the `log` facade.
//! There is no machine-readable format.

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::baud::bluetooth_rates;
use crate::serial::Endpoint;

/// Longest rendered line, in bytes.
pub const MAX_LINE_LEN: usize = 96;

pub type DiagLine = heapless::String<MAX_LINE_LEN>;

/// Status and warning messages shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// The RF modem accepted the new speed.
    ModemBaudSet { baud: u32 },
    /// A Bluetooth reconfiguration asked for a speed the module lacks.
    UnsupportedBluetoothBaud { requested: u32 },
    /// A secondary mode was configured without pins; running primary-only.
    MissingSecondary,
}

impl Diagnostic {
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::ModemBaudSet { .. })
    }

    /// Render to console lines.
    pub fn lines(&self) -> heapless::Vec<DiagLine, 3> {
        let mut lines = heapless::Vec::new();
        let mut line = DiagLine::new();
        match self {
            Self::ModemBaudSet { baud } => {
                let _ = write!(line, "Set RF modem baud rate to {baud}");
                let _ = lines.push(line);
            }
            Self::UnsupportedBluetoothBaud { requested } => {
                let _ = write!(line, "{requested} isn't a supported bluetooth baud rate.");
                let _ = lines.push(line);

                let mut header = DiagLine::new();
                let _ = header.push_str("Supported baud rates are:");
                let _ = lines.push(header);

                let mut rates = DiagLine::new();
                for (i, rate) in bluetooth_rates().enumerate() {
                    let sep = if i == 0 { "" } else { " " };
                    let _ = write!(rates, "{sep}{rate}");
                }
                let _ = lines.push(rates);
            }
            Self::MissingSecondary => {
                let _ = line.push_str(
                    "Secondary serial mode requested without receive/transmit pins; \
                     continuing on primary only.",
                );
                let _ = lines.push(line);
            }
        }
        lines
    }
}

/// Write `diag` to `console` and the log.  Console write failures are
/// logged and otherwise ignored.
pub fn report<E: Endpoint + ?Sized>(console: &mut E, diag: &Diagnostic) {
    for line in diag.lines() {
        if diag.is_warning() {
            warn!("DIAG | {}", line);
        } else {
            info!("DIAG | {}", line);
        }
        if let Err(e) = console.println(&line) {
            debug!("DIAG | console write dropped: {}", e);
        }
    }
}
