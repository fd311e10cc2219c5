//! Integration tests for ChannelTransport routing and construction.

use crate::mock_serial::{MockSerial, RecordingDelay, SerialCall};

use uniserial::config::{ModemConfig, SecondaryPins};
use uniserial::serial::{ChannelTransport, Endpoint, TransportMode};
use uniserial::{ConfigError, Error, LinkError};

fn transport(mode: TransportMode) -> ChannelTransport<MockSerial, MockSerial> {
    ChannelTransport::new(mode, MockSerial::console(), Some(MockSerial::console())).unwrap()
}

// ── Reads favour the secondary ───────────────────────────────

#[test]
fn both_mode_reports_secondary_available_count() {
    let mut t = transport(TransportMode::Both);
    t.open(9600);
    t.primary_mut().inject(b"primary!");
    t.secondary_mut().unwrap().inject(b"sec");

    assert_eq!(t.available(), 3, "must reflect the secondary, not the primary");
    assert_eq!(t.peek(), Some(b's'));
    assert_eq!(t.read(), Some(b's'));
    assert_eq!(t.available(), 2);
    assert_eq!(t.primary().available(), 8, "primary input is untouched");
}

#[test]
fn both_mode_never_falls_back_to_primary_reads() {
    let mut t = transport(TransportMode::Both);
    t.open(9600);
    t.primary_mut().inject(b"x");
    assert_eq!(t.available(), 0);
    assert_eq!(t.read(), None);
    assert_eq!(t.peek(), None);
}

#[test]
fn primary_mode_reads_from_primary() {
    let mut t = ChannelTransport::primary_only(MockSerial::console());
    t.open(9600);
    t.primary_mut().inject(b"hi");
    assert_eq!(t.available(), 2);
    assert_eq!(t.read(), Some(b'h'));
}

// ── Writes fan out ───────────────────────────────────────────

#[test]
fn both_mode_write_reaches_both_endpoints() {
    let mut t = transport(TransportMode::Both);
    t.open(9600);
    t.print("ping").unwrap();
    assert_eq!(t.primary().written(), "ping");
    assert_eq!(t.secondary().unwrap().written(), "ping");
}

#[test]
fn one_failing_endpoint_fails_the_write() {
    let mut t = transport(TransportMode::Both);
    t.open(9600);
    t.primary_mut().fail_writes = true;
    assert_eq!(t.write(b'z'), Err(LinkError::WriteFailed));
    assert_eq!(t.secondary().unwrap().written(), "z", "healthy endpoint still written");

    t.primary_mut().fail_writes = false;
    t.secondary_mut().unwrap().fail_writes = true;
    assert_eq!(t.write(b'y'), Err(LinkError::WriteFailed));
    assert_eq!(t.primary().written(), "y");
}

#[test]
fn secondary_mode_ignores_primary_failures() {
    let mut t = transport(TransportMode::Secondary);
    t.open(4800);
    t.primary_mut().fail_writes = true;
    assert_eq!(t.write(b'a'), Ok(()));
    assert!(t.primary().calls.is_empty(), "primary untouched in secondary mode");
}

// ── open / close / flush ─────────────────────────────────────

#[test]
fn open_closes_secondary_before_reopening() {
    let mut t = transport(TransportMode::Both);
    t.open(19200);
    assert_eq!(t.primary().calls, vec![SerialCall::Open(19200)]);
    assert_eq!(
        t.secondary().unwrap().calls,
        vec![SerialCall::Close, SerialCall::Open(19200)]
    );
}

#[test]
fn close_and_flush_fan_out() {
    let mut t = transport(TransportMode::Both);
    t.open(9600);
    t.flush();
    t.close();
    t.close();
    assert_eq!(t.primary().open_baud(), None);
    assert_eq!(t.secondary().unwrap().open_baud(), None);
    assert!(t.primary().calls.contains(&SerialCall::Flush));
    assert!(t.secondary().unwrap().calls.contains(&SerialCall::Flush));
}

// ── Construction ─────────────────────────────────────────────

#[test]
fn borrowed_primary_stays_with_caller() {
    let mut console = MockSerial::console();
    {
        let mut t =
            ChannelTransport::new(TransportMode::Both, &mut console, Some(MockSerial::console()))
                .unwrap();
        t.open(9600);
        t.println("hello").unwrap();
    }
    assert_eq!(console.written(), "hello\r\n");
}

#[test]
fn missing_secondary_is_a_construction_error() {
    for mode in [TransportMode::Secondary, TransportMode::Both] {
        let r = ChannelTransport::<MockSerial, MockSerial>::new(mode, MockSerial::console(), None);
        assert!(matches!(
            r,
            Err(Error::Config(ConfigError::MissingSecondary))
        ));
    }
}

#[test]
fn pins_build_the_secondary() {
    let mut seen = None;
    let t = ChannelTransport::from_pins(
        TransportMode::Secondary,
        MockSerial::console(),
        Some(SecondaryPins {
            rx: 10,
            tx: 11,
            inverse_logic: true,
        }),
        |pins| {
            seen = Some(pins);
            MockSerial::console()
        },
    )
    .unwrap();
    assert_eq!(t.mode(), TransportMode::Secondary);
    assert_eq!(seen.map(|p| (p.rx, p.tx, p.inverse_logic)), Some((10, 11, true)));
}

#[test]
fn degraded_transport_runs_primary_only() {
    let mut t = ChannelTransport::<MockSerial, MockSerial>::new_or_degrade(
        TransportMode::Secondary,
        MockSerial::console(),
        None,
        9600,
    );
    assert_eq!(t.mode(), TransportMode::Primary);
    assert!(t.secondary().is_none());
    assert_eq!(t.primary().calls[0], SerialCall::Open(9600));
    assert!(t.primary().written_at(9600).contains("primary only"));

    // Still usable afterwards.
    t.open(57600);
    t.print("data").unwrap();
    assert_eq!(t.primary().written_at(57600), "data");
}

// ── begin orchestration ──────────────────────────────────────

#[test]
fn primary_only_begin_never_autobauds() {
    let mut t = ChannelTransport::primary_only(MockSerial::modem_at(57600));
    let mut delay = RecordingDelay::new();
    t.begin_with_modem(9600, &mut delay, &ModemConfig::default())
        .unwrap();
    assert_eq!(t.primary().calls, vec![SerialCall::Open(9600)]);
    assert!(delay.waits_ms.is_empty());
}
