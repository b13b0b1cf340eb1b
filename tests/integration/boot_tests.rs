//! Boot sequence: ordering, initial sample, and radio failure handling.

use smartzipper::app::boot::boot;
use smartzipper::app::events::AppEvent;
use smartzipper::app::shared::SharedState;
use smartzipper::config::FirmwareConfig;
use smartzipper::drivers::hw_init::HwInitError;
use smartzipper::error::{Error, LinkError, SensorError};
use smartzipper::hall::{DebounceWorker, SensorState};

use crate::mock_hw::{HallLine, HookDelay, MockBoard, MockRadio, RecordingSink, Step, Trace};

#[test]
fn boot_runs_steps_in_order() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 10);
    let (mut board, mut radio) = (MockBoard::new(&trace), MockRadio::new(&trace));
    let mut sink = RecordingSink::default();

    let config = FirmwareConfig::default();
    let (_svc, report) =
        boot(&config, &shared, worker, &mut board, &mut radio, &mut sink).unwrap();

    assert_eq!(report.initial, SensorState::High);
    assert_eq!(report.advertising, Ok(()));
    assert_eq!(
        trace.steps(),
        vec![
            Step::PowerOff,
            Step::IndicatorsOff,
            Step::HallArmed,
            Step::PinRead,
            Step::RadioEnable,
            Step::Advertise {
                name: "SmartZipper".into(),
                interval_min: 0x0640,
                interval_max: 0x0C80,
                connectable: true,
                discoverable: true,
            },
        ]
    );
    assert_eq!(
        sink.events,
        vec![
            AppEvent::Booted { initial: SensorState::High },
            AppEvent::AdvertisingStarted,
        ]
    );
}

#[test]
fn initial_sample_has_no_settle_and_is_readable() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(false, &trace);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 10);
    let (mut board, mut radio) = (MockBoard::new(&trace), MockRadio::new(&trace));

    let (svc, report) = boot(
        &FirmwareConfig::default(),
        &shared,
        worker,
        &mut board,
        &mut radio,
        &mut RecordingSink::default(),
    )
    .unwrap();

    assert_eq!(report.initial, SensorState::Low);
    assert_eq!(svc.baseline(), SensorState::Low);
    assert_eq!(shared.read_payload(), b'1');
    assert_eq!(trace.count(|s| matches!(s, Step::Settle(_))), 0);
    // Nothing is pushed at boot; there is no peer yet.
    assert!(!shared.tracker.is_connected());
}

#[test]
fn radio_failure_skips_advertising_but_boots() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 10);
    let mut board = MockBoard::new(&trace);
    let mut radio = MockRadio::new(&trace);
    radio.enable_error = Some(LinkError::StackInitFailed(-1));
    let mut sink = RecordingSink::default();

    let (svc, report) = boot(
        &FirmwareConfig::default(),
        &shared,
        worker,
        &mut board,
        &mut radio,
        &mut sink,
    )
    .unwrap();

    assert_eq!(report.advertising, Err(LinkError::StackInitFailed(-1)));
    assert_eq!(trace.count(|s| matches!(s, Step::Advertise { .. })), 0);
    assert_eq!(svc.baseline(), SensorState::High);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::AdvertisingSkipped(LinkError::StackInitFailed(-1)))
    );
}

#[test]
fn advertising_failure_is_reported_not_fatal() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 10);
    let mut board = MockBoard::new(&trace);
    let mut radio = MockRadio::new(&trace);
    radio.advertise_error = Some(LinkError::AdvertisingFailed(7));

    let (_svc, report) = boot(
        &FirmwareConfig::default(),
        &shared,
        worker,
        &mut board,
        &mut radio,
        &mut RecordingSink::default(),
    )
    .unwrap();
    assert_eq!(report.advertising, Err(LinkError::AdvertisingFailed(7)));
}

#[test]
fn indicator_failure_is_tolerated() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 10);
    let mut board = MockBoard::new(&trace);
    board.indicator_error = Some(HwInitError::GpioConfigFailed(3));
    let mut radio = MockRadio::new(&trace);

    let result = boot(
        &FirmwareConfig::default(),
        &shared,
        worker,
        &mut board,
        &mut radio,
        &mut RecordingSink::default(),
    );
    assert!(result.is_ok());
    assert_eq!(trace.count(|s| *s == Step::HallArmed), 1);
}

#[test]
fn hall_interrupt_failure_aborts_before_sampling() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 10);
    let mut board = MockBoard::new(&trace);
    board.hall_error = Some(HwInitError::IsrInstallFailed(5));
    let mut radio = MockRadio::new(&trace);

    let result = boot(
        &FirmwareConfig::default(),
        &shared,
        worker,
        &mut board,
        &mut radio,
        &mut RecordingSink::default(),
    );
    assert!(matches!(result, Err(Error::Init(HwInitError::IsrInstallFailed(5)))));
    assert_eq!(trace.count(|s| *s == Step::PinRead), 0);
    assert_eq!(trace.count(|s| *s == Step::RadioEnable), 0);
}

#[test]
fn unreadable_pin_aborts_boot() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    line.fail_reads(true);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 10);
    let (mut board, mut radio) = (MockBoard::new(&trace), MockRadio::new(&trace));

    let result = boot(
        &FirmwareConfig::default(),
        &shared,
        worker,
        &mut board,
        &mut radio,
        &mut RecordingSink::default(),
    );
    assert!(matches!(result, Err(Error::Sensor(SensorError::GpioReadFailed))));
}

#[test]
fn invalid_config_touches_nothing() {
    let trace = Trace::default();
    let shared = SharedState::new();
    let line = HallLine::new(true, &trace);
    let worker = DebounceWorker::new(line.pin(), HookDelay::new(&trace), 0);
    let (mut board, mut radio) = (MockBoard::new(&trace), MockRadio::new(&trace));
    let mut config = FirmwareConfig::default();
    config.settle_ms = 0;

    let result = boot(&config, &shared, worker, &mut board, &mut radio, &mut RecordingSink::default());
    assert!(matches!(result, Err(Error::Config(_))));
    assert!(trace.steps().is_empty());
}
