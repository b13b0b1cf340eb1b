//! End-to-end hall pipeline: edge → settle → sample → filter → notify.

use smartzipper::app::boot::boot;
use smartzipper::app::events::AppEvent;
use smartzipper::app::ports::Attribute;
use smartzipper::app::service::{HallService, WakeOutcome};
use smartzipper::app::shared::SharedState;
use smartzipper::config::FirmwareConfig;
use smartzipper::error::{LinkError, SensorError};
use smartzipper::hall::{DebounceWorker, SensorState, StateChange};
use smartzipper::link::{ConnHandle, NotifyOutcome};

use crate::mock_hw::{
    HallLine, HookDelay, MockBoard, MockLink, MockPin, MockRadio, RecordingSink, Step, Trace,
};

type Service<'a> = HallService<'a, MockPin, HookDelay<'a>>;

fn booted<'a>(shared: &'a SharedState, line: &HallLine, delay: HookDelay<'a>, trace: &Trace) -> Service<'a> {
    let worker = DebounceWorker::new(line.pin(), delay, 10);
    let (svc, _) = boot(
        &FirmwareConfig::default(),
        shared,
        worker,
        &mut MockBoard::new(trace),
        &mut MockRadio::new(trace),
        &mut RecordingSink::default(),
    )
    .unwrap();
    svc
}

fn connect(shared: &SharedState, conn_id: u16) {
    shared.on_link_up(0, ConnHandle::new(conn_id, [0xAA; 6]), &mut RecordingSink::default());
    // Swallow the re-sample wake the connect posts.
    assert!(shared.signal.try_take());
}

#[test]
fn magnet_arrival_notifies_connected_peer() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);
    assert_eq!(shared.read_payload(), b'0');
    connect(&shared, 1);

    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());
    line.magnet(true);
    shared.signal.post();
    let out = svc.drain_pending(&mut link, &mut sink);

    assert_eq!(
        out,
        Some(WakeOutcome::Changed {
            change: StateChange { from: SensorState::High, to: SensorState::Low },
            notify: NotifyOutcome::Sent { conn_id: 1 },
        })
    );
    assert_eq!(link.sent.len(), 1);
    assert_eq!(link.sent[0].attr, Attribute::HallState);
    assert_eq!(link.sent[0].payload, b"1");
    assert_eq!(shared.read_payload(), b'1');
    assert_eq!(trace.count(|s| *s == Step::Settle(10)), 1);
}

#[test]
fn burst_of_edges_yields_one_wake_and_one_notify() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);
    connect(&shared, 1);

    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());
    for i in 0..8 {
        line.magnet(i % 2 == 0);
        shared.signal.post();
    }
    line.magnet(true);

    assert!(svc.drain_pending(&mut link, &mut sink).is_some());
    assert!(svc.drain_pending(&mut link, &mut sink).is_none());
    assert_eq!(svc.wakes(), 1);
    assert_eq!(link.payloads(), b"1");
}

#[test]
fn bounce_inside_settle_window_is_absorbed() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let bouncer = line.clone();
    let delay = HookDelay::with_hook(&trace, move |_| {
        // Chatter during the settle interval, then rest with the magnet on.
        for present in [true, false, true, false, true] {
            bouncer.magnet(present);
        }
    });
    let mut svc = booted(&shared, &line, delay, &trace);
    connect(&shared, 1);

    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());
    shared.signal.post();
    svc.drain_pending(&mut link, &mut sink);

    assert_eq!(link.payloads(), b"1");
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::StateChanged { .. })),
        1
    );
}

#[test]
fn bounce_back_to_original_level_sends_nothing() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);
    connect(&shared, 1);

    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());
    line.magnet(true);
    line.magnet(false);
    shared.signal.post();

    assert_eq!(
        svc.drain_pending(&mut link, &mut sink),
        Some(WakeOutcome::Unchanged(SensorState::High))
    );
    assert!(link.sent.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn change_without_peer_updates_read_value_only() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);

    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());
    line.magnet(true);
    shared.signal.post();
    let out = svc.drain_pending(&mut link, &mut sink);

    assert!(matches!(
        out,
        Some(WakeOutcome::Changed { notify: NotifyOutcome::NoPeer, .. })
    ));
    assert!(link.sent.is_empty());
    assert_eq!(shared.read_payload(), b'1');
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::NotifyDropped { state: SensorState::Low })
    );
}

#[test]
fn missed_change_is_not_replayed_on_connect() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);
    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());

    line.magnet(true);
    shared.signal.post();
    svc.drain_pending(&mut link, &mut sink);

    // Peer arrives later; the connect wake re-samples the unchanged pin.
    shared.on_link_up(0, ConnHandle::new(4, [0; 6]), &mut sink);
    assert_eq!(
        svc.drain_pending(&mut link, &mut sink),
        Some(WakeOutcome::Unchanged(SensorState::Low))
    );
    assert!(link.sent.is_empty());
    assert_eq!(shared.read_payload(), b'1');
}

#[test]
fn failed_notify_is_not_retried() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);
    connect(&shared, 1);

    let mut link = MockLink {
        fail_with: Some(LinkError::NotifyFailed(-12)),
        ..MockLink::default()
    };
    let mut sink = RecordingSink::default();
    line.magnet(true);
    shared.signal.post();
    svc.drain_pending(&mut link, &mut sink);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::NotifyFailed {
            state: SensorState::Low,
            error: LinkError::NotifyFailed(-12)
        })
    );

    // The baseline moved anyway: a later wake at the same level is silent.
    link.fail_with = None;
    shared.signal.post();
    assert_eq!(
        svc.drain_pending(&mut link, &mut sink),
        Some(WakeOutcome::Unchanged(SensorState::Low))
    );
    assert!(link.sent.is_empty());
}

#[test]
fn read_failure_keeps_baseline_and_recovers() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);
    connect(&shared, 1);
    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());

    line.magnet(true);
    line.fail_reads(true);
    shared.signal.post();
    assert_eq!(
        svc.drain_pending(&mut link, &mut sink),
        Some(WakeOutcome::ReadFailed(SensorError::GpioReadFailed))
    );
    assert_eq!(svc.baseline(), SensorState::High);
    assert_eq!(shared.read_payload(), b'0');

    line.fail_reads(false);
    shared.signal.post();
    svc.drain_pending(&mut link, &mut sink);
    assert_eq!(link.payloads(), b"1");
}

#[test]
fn alternating_changes_notify_in_order() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let mut svc = booted(&shared, &line, HookDelay::new(&trace), &trace);
    connect(&shared, 2);
    let (mut link, mut sink) = (MockLink::default(), RecordingSink::default());

    for present in [true, false, true, true, false] {
        line.magnet(present);
        shared.signal.post();
        svc.drain_pending(&mut link, &mut sink);
    }
    assert_eq!(link.payloads(), b"1010");
    assert!(link.sent.iter().all(|s| s.conn_id == 2));
}
