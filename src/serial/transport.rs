//! Dual-endpoint channel transport.
//!
//! ```text
//!                    ┌──────────────────────┐ ──▶ primary   (borrowed / injected)
//!   caller ──▶ ───── │   ChannelTransport   │
//!                    └──────────────────────┘ ──▶ secondary (owned, optional)
//! ```
//!
//! The [`TransportMode`] fixed at construction selects which endpoints are
//! active.  Every fan-out operation iterates the active set:
//!
//! | Operation                   | Primary | Secondary | Both                    |
//! |-----------------------------|---------|-----------|-------------------------|
//! | `open` / `close` / `flush`  | primary | secondary | both                    |
//! | `write`                     | primary | secondary | both, results ANDed     |
//! | `read` / `peek` / `available` | primary | secondary | **secondary only**    |
//!
//! Reads in `Both` mode deliberately favour the secondary endpoint even when
//! the primary also has pending bytes.  Writes fan out to every active
//! endpoint and a failure on any one of them fails the whole write, with no
//! indication of which endpoint rejected the byte.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::bluetooth::{self, BluetoothOutcome};
use crate::config::{BluetoothConfig, ModemConfig, SecondaryPins};
use crate::diagnostics::{self, Diagnostic};
use crate::error::{ConfigError, LinkError, Result};
use crate::modem;

use super::{Endpoint, NullEndpoint};

/// Which endpoint(s) a [`ChannelTransport`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    /// Primary endpoint only.
    Primary,
    /// Secondary endpoint only.
    Secondary,
    /// Both endpoints; writes fan out, reads come from the secondary.
    Both,
}

impl TransportMode {
    pub const fn includes_primary(self) -> bool {
        matches!(self, Self::Primary | Self::Both)
    }

    pub const fn includes_secondary(self) -> bool {
        matches!(self, Self::Secondary | Self::Both)
    }
}

/// Routes serial I/O to a primary and an optional secondary endpoint.
///
/// The primary endpoint is always present and doubles as the diagnostic
/// console.  Pass it by `&mut` to keep ownership with the caller.  The
/// secondary endpoint is owned and only exists when the mode uses it.
pub struct ChannelTransport<P, S = NullEndpoint> {
    mode: TransportMode,
    primary: P,
    secondary: Option<S>,
}

impl<P: Endpoint> ChannelTransport<P, NullEndpoint> {
    /// Transport over the primary endpoint alone.
    pub fn primary_only(primary: P) -> Self {
        Self {
            mode: TransportMode::Primary,
            primary,
            secondary: None,
        }
    }
}

impl<P: Endpoint, S: Endpoint> ChannelTransport<P, S> {
    /// Build a transport, rejecting a secondary mode without a secondary
    /// endpoint.  A secondary endpoint passed with [`TransportMode::Primary`]
    /// is dropped.
    pub fn new(mode: TransportMode, primary: P, secondary: Option<S>) -> Result<Self> {
        let secondary = secondary.filter(|_| mode.includes_secondary());
        if mode.includes_secondary() && secondary.is_none() {
            return Err(ConfigError::MissingSecondary.into());
        }
        Ok(Self {
            mode,
            primary,
            secondary,
        })
    }

    /// Build the secondary endpoint from its pins when the mode needs one.
    pub fn from_pins<F>(
        mode: TransportMode,
        primary: P,
        pins: Option<SecondaryPins>,
        build: F,
    ) -> Result<Self>
    where
        F: FnOnce(SecondaryPins) -> S,
    {
        let secondary = if mode.includes_secondary() {
            pins.map(build)
        } else {
            None
        };
        Self::new(mode, primary, secondary)
    }

    /// Like [`new`](Self::new), but a missing secondary endpoint degrades the
    /// transport to primary-only and prints a warning on the primary
    /// endpoint at `diagnostic_baud`.
    pub fn new_or_degrade(
        mode: TransportMode,
        primary: P,
        secondary: Option<S>,
        diagnostic_baud: u32,
    ) -> Self {
        let secondary = secondary.filter(|_| mode.includes_secondary());
        if mode.includes_secondary() && secondary.is_none() {
            warn!("TRANSPORT | {:?} requested without secondary, degrading", mode);
            let mut degraded = Self {
                mode: TransportMode::Primary,
                primary,
                secondary: None,
            };
            degraded.primary.open(diagnostic_baud);
            degraded.report(&Diagnostic::MissingSecondary);
            return degraded;
        }
        Self {
            mode,
            primary,
            secondary,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut P {
        &mut self.primary
    }

    pub fn secondary(&self) -> Option<&S> {
        self.secondary.as_ref()
    }

    pub fn secondary_mut(&mut self) -> Option<&mut S> {
        self.secondary.as_mut()
    }

    pub fn into_parts(self) -> (P, Option<S>) {
        (self.primary, self.secondary)
    }

    // ── Endpoint set ──────────────────────────────────────────

    /// The endpoints every fan-out operation touches, primary first.
    pub(crate) fn active(&mut self) -> Vec<&mut dyn Endpoint, 2> {
        let mut set: Vec<&mut dyn Endpoint, 2> = Vec::new();
        if self.mode.includes_primary() {
            let _ = set.push(&mut self.primary);
        }
        if self.mode.includes_secondary() {
            if let Some(secondary) = self.secondary.as_mut() {
                let _ = set.push(secondary);
            }
        }
        set
    }

    /// The single endpoint reads are served from.
    fn reader(&mut self) -> &mut dyn Endpoint {
        match self.secondary.as_mut() {
            Some(secondary) if self.mode.includes_secondary() => secondary,
            _ => &mut self.primary,
        }
    }

    fn reader_ref(&self) -> &dyn Endpoint {
        match self.secondary.as_ref() {
            Some(secondary) if self.mode.includes_secondary() => secondary,
            _ => &self.primary,
        }
    }

    // ── Diagnostics ───────────────────────────────────────────

    /// Print a diagnostic on the primary endpoint.
    pub fn report(&mut self, diag: &Diagnostic) {
        diagnostics::report(&mut self.primary, diag);
    }

    /// Open the primary endpoint for diagnostics when the mode does not
    /// already drive it.
    pub(crate) fn open_console(&mut self, baud: u32) {
        if !self.mode.includes_primary() {
            self.primary.open(baud);
        }
    }

    // ── Orchestration ─────────────────────────────────────────

    /// Open every active endpoint at `baud`, first reprogramming the RF
    /// modem behind the secondary endpoint to that speed.
    ///
    /// The secondary endpoint ends open at `baud` whether or not the modem
    /// answered; a modem that never acknowledged is reported as
    /// [`ModemError::NoAcknowledgment`](crate::ModemError::NoAcknowledgment).
    /// Primary-only transports skip the modem entirely. In secondary-only
    /// mode the primary is still opened at `baud` to carry the confirmation.
    pub fn begin_with_modem<D: DelayNs>(
        &mut self,
        baud: u32,
        delay: &mut D,
        config: &ModemConfig,
    ) -> Result<()> {
        if self.mode.includes_primary() {
            self.primary.open(baud);
        }
        if !self.mode.includes_secondary() {
            debug!("TRANSPORT | no secondary endpoint, modem setup skipped");
            return Ok(());
        }
        self.open_console(baud);
        let Some(secondary) = self.secondary.as_mut() else {
            return Ok(());
        };

        let outcome = modem::configure(secondary, &mut self.primary, baud, delay, config);
        secondary.close();
        secondary.open(baud);
        match outcome {
            Ok(confirmation) => {
                info!(
                    "TRANSPORT | modem moved {} -> {} baud",
                    confirmation.baud, baud
                );
                Ok(())
            }
            Err(e) => {
                warn!("TRANSPORT | modem setup failed ({}), link at {} baud", e, baud);
                Err(e)
            }
        }
    }

    /// Move a Bluetooth serial module on the active endpoints to `baud`.
    /// See [`bluetooth::reconfigure`].
    pub fn begin_bluetooth<D: DelayNs>(
        &mut self,
        baud: u32,
        delay: &mut D,
        config: &BluetoothConfig,
    ) -> BluetoothOutcome {
        bluetooth::reconfigure(self, baud, delay, config)
    }
}

impl<P: Endpoint, S: Endpoint> Endpoint for ChannelTransport<P, S> {
    /// Opens the primary endpoint and closes-then-reopens the secondary.
    fn open(&mut self, baud: u32) {
        if self.mode.includes_primary() {
            self.primary.open(baud);
        }
        if self.mode.includes_secondary() {
            if let Some(secondary) = self.secondary.as_mut() {
                secondary.close();
                secondary.open(baud);
            }
        }
    }

    fn close(&mut self) {
        for ep in self.active() {
            ep.close();
        }
    }

    fn read(&mut self) -> Option<u8> {
        self.reader().read()
    }

    fn peek(&mut self) -> Option<u8> {
        self.reader().peek()
    }

    fn available(&self) -> usize {
        self.reader_ref().available()
    }

    fn write(&mut self, byte: u8) -> core::result::Result<(), LinkError> {
        let mut accepted = true;
        for ep in self.active() {
            accepted &= ep.write(byte).is_ok();
        }
        if accepted {
            Ok(())
        } else {
            Err(LinkError::WriteFailed)
        }
    }

    fn flush(&mut self) {
        for ep in self.active() {
            ep.flush();
        }
    }
}
