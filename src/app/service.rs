//! Hall service — the worker-side core.
//!
//! [`HallService`] owns the debounce worker, the change filter and the
//! notifier, and runs them in sequence on every wake.  It is the only
//! writer of the last-published state, so none of that needs locking.
//!
//! ```text
//!  EdgeSignal ──wait──▶ ┌──────────────────────────────┐ ──▶ LinkPort
//!                       │         HallService          │
//!  InputPin + DelayNs ─▶│ settle · sample · filter ·   │ ──▶ EventSink
//!                       │ notify                       │
//!                       └──────────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{info, warn};

use super::events::AppEvent;
use super::ports::{Attribute, EventSink, LinkPort};
use super::shared::SharedState;
use crate::error::SensorError;
use crate::hall::{ChangeFilter, DebounceWorker, SamplePhase, SensorState, StateChange};
use crate::link::{Notifier, NotifyOutcome};

/// Result of processing one wake-up unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// The settled sample matched the baseline.
    Unchanged(SensorState),
    /// The baseline moved; `notify` says what happened to the send.
    Changed {
        change: StateChange,
        notify: NotifyOutcome,
    },
    /// The pin could not be read; the next edge will try again.
    ReadFailed(SensorError),
}

pub struct HallService<'a, P, D> {
    shared: &'a SharedState,
    worker: DebounceWorker<P, D>,
    filter: ChangeFilter,
    notifier: Notifier,
    wakes: u64,
}

impl<'a, P, D> HallService<'a, P, D>
where
    P: InputPin,
    D: DelayNs,
{
    /// Build the service around an already-taken `baseline` sample.
    pub fn new(shared: &'a SharedState, worker: DebounceWorker<P, D>, baseline: SensorState) -> Self {
        shared.published.store(baseline);
        Self {
            shared,
            worker,
            filter: ChangeFilter::new(baseline),
            notifier: Notifier::new(Attribute::HallState),
            wakes: 0,
        }
    }

    /// Last published state.
    pub fn baseline(&self) -> SensorState {
        self.filter.last()
    }

    pub fn phase(&self) -> SamplePhase {
        self.worker.phase()
    }

    /// Wake-up units consumed since boot.
    pub fn wakes(&self) -> u64 {
        self.wakes
    }

    /// Process one consumed wake-up unit: settle, sample, filter, notify.
    pub fn on_wake(&mut self, link: &mut impl LinkPort, sink: &mut impl EventSink) -> WakeOutcome {
        self.wakes += 1;

        let sample = match self.worker.settle_and_sample() {
            Ok(s) => s,
            Err(e) => {
                warn!("hall: sample failed ({}), waiting for next edge", e);
                return WakeOutcome::ReadFailed(e);
            }
        };

        let Some(change) = self.filter.evaluate(sample) else {
            return WakeOutcome::Unchanged(sample);
        };

        self.shared.published.store(change.to);
        info!("hall: {} -> {}", change.from, change.to);
        sink.emit(&AppEvent::StateChanged {
            from: change.from,
            to: change.to,
        });

        let notify = self
            .notifier
            .publish(change.to, &self.shared.tracker, link);
        sink.emit(&match notify {
            NotifyOutcome::Sent { conn_id } => AppEvent::Notified {
                state: change.to,
                conn_id,
            },
            NotifyOutcome::NoPeer => AppEvent::NotifyDropped { state: change.to },
            NotifyOutcome::Failed(error) => AppEvent::NotifyFailed {
                state: change.to,
                error,
            },
        });

        WakeOutcome::Changed { change, notify }
    }

    /// Consume a pending wake-up unit if there is one and process it.
    pub fn drain_pending(
        &mut self,
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) -> Option<WakeOutcome> {
        if self.shared.signal.try_take() {
            Some(self.on_wake(link, sink))
        } else {
            None
        }
    }

    /// Worker task body.  Blocks on the edge signal forever.
    pub fn run(&mut self, link: &mut impl LinkPort, sink: &mut impl EventSink) -> ! {
        info!(
            "hall: worker running (settle={}ms, baseline={:?})",
            self.worker.settle_ms(),
            self.baseline()
        );
        loop {
            self.shared.signal.wait_blocking();
            self.on_wake(link, sink);
        }
    }
}
