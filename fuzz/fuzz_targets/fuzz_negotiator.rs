//! Fuzz target: `AutobaudNegotiator`
//!
//! The modem replies with arbitrary bytes at an arbitrary probe. Verifies:
//! - No panics whatever the reply
//! - The run always ends in a terminal state
//! - At most one attempt per candidate plus the reset probe
//! - The captured acknowledgment never exceeds two bytes
//!
//! cargo fuzz run fuzz_negotiator

#![no_main]

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use uniserial::LinkError;
use uniserial::config::ModemConfig;
use uniserial::modem::AutobaudNegotiator;
use uniserial::serial::Endpoint;

struct ScriptedModem<'a> {
    answer_on: usize,
    reply: &'a [u8],
    opens: usize,
    rx: Vec<u8>,
}

impl Endpoint for ScriptedModem<'_> {
    fn open(&mut self, _baud: u32) {
        self.opens += 1;
        self.rx.clear();
        if self.opens == self.answer_on {
            self.rx.extend_from_slice(self.reply);
        }
    }
    fn close(&mut self) {
        self.rx.clear();
    }
    fn read(&mut self) -> Option<u8> {
        (!self.rx.is_empty()).then(|| self.rx.remove(0))
    }
    fn peek(&mut self) -> Option<u8> {
        self.rx.first().copied()
    }
    fn available(&self) -> usize {
        self.rx.len()
    }
    fn write(&mut self, _byte: u8) -> Result<(), LinkError> {
        Ok(())
    }
    fn flush(&mut self) {}
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&head, reply)) = data.split_first() else {
        return;
    };
    let config = ModemConfig {
        require_ack: head & 0x80 != 0,
        ..ModemConfig::exhaustive()
    };
    let mut modem = ScriptedModem {
        answer_on: usize::from(head & 0x0F),
        reply,
        opens: 0,
        rx: Vec::new(),
    };
    let target = u32::from_le_bytes([head, 0x25, 0, 0]);

    let mut negotiator = AutobaudNegotiator::new(target, &config);
    let result = negotiator.run(&mut modem, &mut NoDelay);

    assert!(negotiator.state().is_terminal());
    assert!(negotiator.attempts().len() <= config.probe_order.len() + 1);
    if let Ok(confirmation) = result {
        assert!(confirmation.ack.len() <= 2);
        assert!(!confirmation.ack.is_empty());
    }
});
