//! Bluetooth serial module speed change.
//!
//! The module ships at a known default speed, so there is no discovery:
//! each active endpoint is opened at the default, put into command mode with
//! `$$$`, sent `U,<token>,N`, and reopened at the new speed.  The change is
//! volatile.  The module falls back to its default on power loss, and a
//! second call before then still assumes the default.

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::baud::BaudRate;
use crate::config::BluetoothConfig;
use crate::diagnostics::Diagnostic;
use crate::serial::{ChannelTransport, Endpoint};

/// Command-mode guard.
pub const GUARD: &str = "$$$";

/// What a reconfiguration request did to the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BluetoothOutcome {
    /// The target is the module default; opened there without commands.
    AlreadyAtDefault,
    /// The module was told to switch and the link reopened at the new speed.
    Reconfigured(BaudRate),
    /// The target is not a module speed; link opened at the default and a
    /// warning printed.
    Unsupported { requested: u32 },
}

/// `U,<token>,N` for `rate`, if the module supports it.
pub fn rate_command(rate: BaudRate) -> Option<heapless::String<16>> {
    let token = rate.bluetooth_token()?;
    let mut cmd = heapless::String::new();
    let _ = write!(cmd, "U,{token},N");
    Some(cmd)
}

/// Move the Bluetooth module on every active endpoint of `transport` to
/// `target`, leaving each endpoint open at the resulting speed.
///
/// Endpoints are reprogrammed one after another, primary first, each with
/// its own guard and rate command.  An unsupported target is reported on
/// the primary endpoint, never returned as an error.
pub fn reconfigure<P, S, D>(
    transport: &mut ChannelTransport<P, S>,
    target: u32,
    delay: &mut D,
    config: &BluetoothConfig,
) -> BluetoothOutcome
where
    P: Endpoint,
    S: Endpoint,
    D: DelayNs,
{
    let default = config.default_baud.as_u32();
    let requested = BaudRate::from_u32(target);
    let Some((rate, command)) = requested.and_then(|r| rate_command(r).map(|c| (r, c))) else {
        warn!("BT | {} rejected, staying at {}", target, default);
        transport.open(default);
        transport.open_console(default);
        transport.report(&Diagnostic::UnsupportedBluetoothBaud { requested: target });
        return BluetoothOutcome::Unsupported { requested: target };
    };

    if rate == config.default_baud {
        info!("BT | {} is the module default, no command mode", target);
        transport.open(default);
        return BluetoothOutcome::AlreadyAtDefault;
    }

    for ep in transport.active() {
        reprogram(ep, &command, default, target, delay, config.guard_settle_ms);
    }
    info!("BT | module moved {} -> {}", default, target);
    BluetoothOutcome::Reconfigured(rate)
}

fn reprogram<D: DelayNs>(
    ep: &mut dyn Endpoint,
    command: &str,
    default: u32,
    target: u32,
    delay: &mut D,
    guard_settle_ms: u32,
) {
    ep.close();
    ep.open(default);
    let guard = ep.print(GUARD);
    delay.delay_ms(guard_settle_ms);
    let sent = ep.println(command);
    ep.flush();
    ep.close();
    ep.open(target);
    if let Err(e) = guard.and(sent) {
        warn!("BT | command to endpoint not fully sent: {}", e);
    }
}
