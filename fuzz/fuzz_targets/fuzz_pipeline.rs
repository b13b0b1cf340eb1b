//! Fuzz target: hall pipeline under arbitrary event streams
//!
//! Each input byte is one event: the low three bits pick the kind, the
//! rest parameterise it.  Asserts that reads always track the worker's
//! baseline and that notifications only reach the tracked peer.
//!
//! cargo fuzz run fuzz_pipeline

#![no_main]

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use libfuzzer_sys::fuzz_target;
use smartzipper::app::events::AppEvent;
use smartzipper::app::ports::{Attribute, EventSink, LinkPort};
use smartzipper::app::service::HallService;
use smartzipper::app::shared::SharedState;
use smartzipper::error::LinkError;
use smartzipper::hall::{DebounceWorker, SensorState};
use smartzipper::link::ConnHandle;

struct Pin(Rc<Cell<bool>>);

impl ErrorType for Pin {
    type Error = Infallible;
}

impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct Link {
    expect: Option<u16>,
    fail: bool,
}

impl LinkPort for Link {
    fn notify(&mut self, conn: &ConnHandle, _a: Attribute, p: &[u8]) -> Result<(), LinkError> {
        assert_eq!(Some(conn.conn_id()), self.expect, "notify to untracked peer");
        assert_eq!(p.len(), 1);
        assert!(SensorState::from_payload(p[0]).is_some());
        if self.fail {
            return Err(LinkError::NotifyFailed(-1));
        }
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _e: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&first, ops)) = data.split_first() else {
        return;
    };
    let shared = SharedState::new();
    let level = Rc::new(Cell::new(first & 1 == 1));
    let worker = DebounceWorker::new(Pin(level.clone()), NoDelay, 10);
    let mut svc = HallService::new(&shared, worker, SensorState::from_level(level.get()));
    let mut link = Link { expect: None, fail: false };

    for &b in ops {
        let arg = b >> 3;
        match b & 0x07 {
            0 => {
                level.set(arg & 1 == 1);
                shared.signal.post();
            }
            1 => level.set(arg & 1 == 1),
            2 | 3 => {
                link.expect = shared.tracker.current().map(|h| h.conn_id());
                svc.drain_pending(&mut link, &mut Discard);
            }
            4 => {
                shared.on_link_up(0, ConnHandle::new(u16::from(arg & 3), [0; 6]), &mut Discard);
            }
            5 => {
                shared.on_link_up(arg | 1, ConnHandle::new(u16::from(arg & 3), [0; 6]), &mut Discard);
            }
            6 => {
                shared.on_link_down(u16::from(arg & 3), &mut Discard);
            }
            _ => link.fail = !link.fail,
        }
        assert_eq!(shared.read_payload(), svc.baseline().payload());
    }
});
