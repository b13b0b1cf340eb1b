//! Mock hardware for integration tests.
//!
//! Records every board, radio and link call so tests can assert on the full
//! history without touching real GPIO or the radio.  The hall pin level is
//! shared through an `Rc<Cell<_>>` so a test (or a delay hook running
//! mid-settle) can move the magnet at any point.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin};
use smartzipper::app::events::AppEvent;
use smartzipper::app::ports::{
    AdvertisingParams, Attribute, BoardPort, EventSink, LinkPort, RadioPort,
};
use smartzipper::drivers::hw_init::HwInitError;
use smartzipper::error::LinkError;
use smartzipper::link::ConnHandle;

// ── Call trace ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    PowerOff,
    IndicatorsOff,
    HallArmed,
    PinRead,
    Settle(u32),
    RadioEnable,
    Advertise {
        name: String,
        interval_min: u16,
        interval_max: u16,
        connectable: bool,
        discoverable: bool,
    },
}

#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Step>>>);

impl Trace {
    pub fn push(&self, step: Step) {
        self.0.borrow_mut().push(step);
    }

    pub fn steps(&self) -> Vec<Step> {
        self.0.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Step) -> bool) -> usize {
        self.0.borrow().iter().filter(|s| pred(s)).count()
    }
}

// ── Hall pin ──────────────────────────────────────────────────

#[derive(Debug)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Handle on the simulated hall line.  HIGH means no magnet.
#[derive(Clone)]
pub struct HallLine {
    high: Rc<Cell<bool>>,
    fail: Rc<Cell<bool>>,
    trace: Trace,
}

impl HallLine {
    pub fn new(high: bool, trace: &Trace) -> Self {
        Self {
            high: Rc::new(Cell::new(high)),
            fail: Rc::new(Cell::new(false)),
            trace: trace.clone(),
        }
    }

    pub fn magnet(&self, present: bool) {
        self.high.set(!present);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn pin(&self) -> MockPin {
        MockPin(self.clone())
    }
}

pub struct MockPin(HallLine);

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        self.0.trace.push(Step::PinRead);
        if self.0.fail.get() {
            return Err(PinFault);
        }
        Ok(self.0.high.get())
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        self.is_high().map(|h| !h)
    }
}

// ── Settle delay ──────────────────────────────────────────────

/// Delay that runs `hook` in place of sleeping, so tests can inject
/// bounce or link events into the settle window.
pub struct HookDelay<'a> {
    trace: Trace,
    hook: Box<dyn FnMut(u32) + 'a>,
    calls: u32,
}

impl<'a> HookDelay<'a> {
    pub fn new(trace: &Trace) -> Self {
        Self::with_hook(trace, |_| {})
    }

    /// `hook` receives the 1-based index of the settle call.
    pub fn with_hook(trace: &Trace, hook: impl FnMut(u32) + 'a) -> Self {
        Self {
            trace: trace.clone(),
            hook: Box::new(hook),
            calls: 0,
        }
    }
}

impl DelayNs for HookDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.trace.push(Step::Settle(ms));
        (self.hook)(self.calls);
    }
}

// ── Board ─────────────────────────────────────────────────────

pub struct MockBoard {
    trace: Trace,
    pub indicator_error: Option<HwInitError>,
    pub hall_error: Option<HwInitError>,
}

impl MockBoard {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            indicator_error: None,
            hall_error: None,
        }
    }
}

impl BoardPort for MockBoard {
    fn disable_power_regulation(&mut self) {
        self.trace.push(Step::PowerOff);
    }

    fn indicators_off(&mut self) -> Result<(), HwInitError> {
        self.trace.push(Step::IndicatorsOff);
        self.indicator_error.map_or(Ok(()), Err)
    }

    fn configure_hall_interrupt(&mut self) -> Result<(), HwInitError> {
        self.trace.push(Step::HallArmed);
        self.hall_error.map_or(Ok(()), Err)
    }
}

// ── Radio ─────────────────────────────────────────────────────

pub struct MockRadio {
    trace: Trace,
    pub enable_error: Option<LinkError>,
    pub advertise_error: Option<LinkError>,
}

impl MockRadio {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            enable_error: None,
            advertise_error: None,
        }
    }
}

impl RadioPort for MockRadio {
    fn enable(&mut self) -> Result<(), LinkError> {
        self.trace.push(Step::RadioEnable);
        self.enable_error.map_or(Ok(()), Err)
    }

    fn start_advertising(&mut self, params: &AdvertisingParams<'_>) -> Result<(), LinkError> {
        self.trace.push(Step::Advertise {
            name: params.name.to_owned(),
            interval_min: params.interval_min,
            interval_max: params.interval_max,
            connectable: params.connectable,
            discoverable: params.discoverable,
        });
        self.advertise_error.map_or(Ok(()), Err)
    }
}

// ── Link ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub conn_id: u16,
    pub attr: Attribute,
    pub payload: Vec<u8>,
    /// Strong count on the handle while the send was in flight.
    pub handle_refs: usize,
}

#[derive(Default)]
pub struct MockLink {
    pub sent: Vec<Sent>,
    pub fail_with: Option<LinkError>,
}

impl MockLink {
    pub fn payloads(&self) -> Vec<u8> {
        self.sent.iter().flat_map(|s| s.payload.iter().copied()).collect()
    }
}

impl LinkPort for MockLink {
    fn notify(&mut self, conn: &ConnHandle, attr: Attribute, payload: &[u8]) -> Result<(), LinkError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.sent.push(Sent {
            conn_id: conn.conn_id(),
            attr,
            payload: payload.to_vec(),
            handle_refs: conn.ref_count(),
        });
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
