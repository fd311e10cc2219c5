//! RF modem speed change, issued once the modem is in command mode.

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::baud::modem_code_for;
use crate::config::ModemConfig;
use crate::error::LinkError;
use crate::serial::Endpoint;

use super::negotiator::Confirmation;
use super::{CMD_EXIT, CMD_PERSIST, CMD_SET_BAUD};

/// Program the modem to `target`, persist it and leave command mode.
///
/// Runs at the speed in `confirmed`; the link must still be open there.
/// Unknown targets are programmed with the fallback code rather than
/// rejected.  The link is *not* reopened at `target`: the modem only
/// switches after `ATCN`, so reopening is left to the caller.
///
/// Returns the `ATBD` code that was sent.  Every command is sent even if an
/// earlier write failed.
pub fn apply_baud<E, D>(
    link: &mut E,
    confirmed: &Confirmation,
    target: u32,
    delay: &mut D,
    config: &ModemConfig,
) -> Result<u8, LinkError>
where
    E: Endpoint + ?Sized,
    D: DelayNs,
{
    let code = modem_code_for(target);
    let mut set_baud = heapless::String::<16>::new();
    let _ = write!(set_baud, "{CMD_SET_BAUD}{code}");
    debug!(
        "MODEM | at {}: {} for target {}",
        confirmed.baud, set_baud, target
    );

    let set = link.println(&set_baud);
    let persist = link.println(CMD_PERSIST);
    delay.delay_ms(config.persist_settle_ms);
    let exit = link.println(CMD_EXIT);
    delay.delay_ms(config.exit_settle_ms);

    info!("MODEM | code {} written, command mode closed", code);
    set.and(persist).and(exit).map(|()| code)
}
