//! RF modem autobaud negotiation.
//!
//! Finds the speed an attached modem is currently running at by pushing the
//! `+++` command-mode guard at a sequence of candidate speeds until one of
//! them gets a reply.
//!
//! ```text
//!  Idle ──▶ Resetting ──▶ AwaitingResponse(target) ──reply──▶ Confirmed(rate)
//!                               │ silent                          ▲
//!                               ▼                                 │ reply
//!                    ProbingGuard(candidate) ──▶ AwaitingResponse(candidate)
//!                               ▲                  │ silent, more candidates
//!                               └──────────────────┘
//!                                                  │ silent, list exhausted
//!                                                  ▼
//!                                              Exhausted
//! ```
//!
//! Each call to [`AutobaudNegotiator::step`] performs the work of one state
//! and moves to the next.  Every probe ends with a blocking settle delay;
//! there is no other timeout, so a silent modem costs exactly the boot
//! settle plus one guard settle per probe.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::{MAX_PROBE_CANDIDATES, ModemConfig};
use crate::error::ModemError;
use crate::serial::Endpoint;

use super::{ACK, GUARD};

/// Acknowledgment bytes drained after a confirmed probe.
pub const ACK_LEN: usize = 2;

/// Position of the negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// Nothing has happened yet.
    Idle,
    /// Link closed and the modem given time to boot.
    Resetting,
    /// About to reopen at `rate` and send the guard.
    ProbingGuard(u32),
    /// Guard sent at `rate`; waiting to see if anything came back.
    AwaitingResponse(u32),
    /// The modem answered at `rate` and is in command mode.
    Confirmed(u32),
    /// The modem answered at `rate` with something other than `OK`.
    Rejected(u32),
    /// No candidate got a reply.
    Exhausted,
}

impl ProbeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Rejected(_) | Self::Exhausted)
    }
}

/// Proof that the modem is in command mode at `baud`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Speed the modem is currently running at.
    pub baud: u32,
    /// Up to two acknowledgment bytes.  Often short or garbled at high
    /// speeds and not used to decide success unless `require_ack` is set.
    pub ack: heapless::Vec<u8, ACK_LEN>,
}

impl Confirmation {
    pub fn ack_is_ok(&self) -> bool {
        self.ack.as_slice() == ACK.as_bytes()
    }
}

/// Outcome of a full negotiation.
pub type NegotiationResult = Result<Confirmation, ModemError>;

/// Autobaud state machine for one modem link.
pub struct AutobaudNegotiator<'c> {
    config: &'c ModemConfig,
    target: u32,
    state: ProbeState,
    next_candidate: usize,
    ack: heapless::Vec<u8, ACK_LEN>,
    /// Every speed a guard was sent at, in order.
    attempts: heapless::Vec<u32, { MAX_PROBE_CANDIDATES + 1 }>,
}

impl<'c> AutobaudNegotiator<'c> {
    /// Negotiator that tries `target` first, then `config.probe_order`.
    pub fn new(target: u32, config: &'c ModemConfig) -> Self {
        Self {
            config,
            target,
            state: ProbeState::Idle,
            next_candidate: 0,
            ack: heapless::Vec::new(),
            attempts: heapless::Vec::new(),
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// Speeds probed so far, target first.
    pub fn attempts(&self) -> &[u32] {
        &self.attempts
    }

    /// Run the state machine to a terminal state.
    pub fn run<E, D>(&mut self, link: &mut E, delay: &mut D) -> NegotiationResult
    where
        E: Endpoint + ?Sized,
        D: DelayNs,
    {
        while !self.state.is_terminal() {
            self.step(link, delay);
        }
        self.result()
    }

    /// Result of a finished negotiation.  `NoAcknowledgment` while still
    /// running.
    pub fn result(&self) -> NegotiationResult {
        match self.state {
            ProbeState::Confirmed(baud) => Ok(Confirmation {
                baud,
                ack: self.ack.clone(),
            }),
            ProbeState::Rejected(_) => Err(ModemError::AckMismatch),
            _ => Err(ModemError::NoAcknowledgment),
        }
    }

    /// Perform one state's work and advance.  No-op once terminal.
    pub fn step<E, D>(&mut self, link: &mut E, delay: &mut D) -> ProbeState
    where
        E: Endpoint + ?Sized,
        D: DelayNs,
    {
        self.state = match self.state {
            ProbeState::Idle => {
                link.close();
                debug!("AUTOBAUD | link closed, waiting {} ms for boot", self.config.boot_settle_ms);
                delay.delay_ms(self.config.boot_settle_ms);
                ProbeState::Resetting
            }
            ProbeState::Resetting => {
                // Already closed by the reset.
                self.send_guard(link, delay, self.target);
                ProbeState::AwaitingResponse(self.target)
            }
            ProbeState::ProbingGuard(rate) => {
                link.close();
                self.send_guard(link, delay, rate);
                ProbeState::AwaitingResponse(rate)
            }
            ProbeState::AwaitingResponse(rate) => {
                if link.available() > 0 {
                    self.drain_ack(link);
                    self.confirm(rate)
                } else if let Some(&next) = self.config.probe_order.get(self.next_candidate) {
                    self.next_candidate += 1;
                    debug!("AUTOBAUD | silent at {}, next {}", rate, next);
                    ProbeState::ProbingGuard(next.as_u32())
                } else {
                    warn!(
                        "AUTOBAUD | {} after {} probes",
                        ModemError::NoAcknowledgment,
                        self.attempts.len()
                    );
                    ProbeState::Exhausted
                }
            }
            terminal => terminal,
        };
        self.state
    }

    fn send_guard<E, D>(&mut self, link: &mut E, delay: &mut D, rate: u32)
    where
        E: Endpoint + ?Sized,
        D: DelayNs,
    {
        link.open(rate);
        if let Err(e) = link.print(GUARD) {
            debug!("AUTOBAUD | guard write at {} failed: {}", rate, e);
        }
        let _ = self.attempts.push(rate);
        delay.delay_ms(self.config.guard_settle_ms);
    }

    /// Best-effort read of the acknowledgment.  Stops at the first missing
    /// byte.
    fn drain_ack<E: Endpoint + ?Sized>(&mut self, link: &mut E) {
        self.ack.clear();
        for _ in 0..ACK_LEN {
            match link.read() {
                Some(b) => {
                    let _ = self.ack.push(b);
                }
                None => break,
            }
        }
    }

    fn confirm(&self, rate: u32) -> ProbeState {
        if self.ack.as_slice() == ACK.as_bytes() {
            info!("AUTOBAUD | modem in command mode at {}", rate);
            ProbeState::Confirmed(rate)
        } else if self.config.require_ack {
            warn!("AUTOBAUD | reply at {} was {:?}, expected OK", rate, self.ack.as_slice());
            ProbeState::Rejected(rate)
        } else {
            info!(
                "AUTOBAUD | modem replied at {} ({} ack bytes), accepting",
                rate,
                self.ack.len()
            );
            ProbeState::Confirmed(rate)
        }
    }
}
