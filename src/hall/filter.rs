//! Change filter — suppresses samples that match the last published state.
//!
//! The baseline is updated *before* the change is handed to the notifier,
//! so a duplicate sample arriving right after is compared against the new
//! value and dropped.

use super::state::SensorState;

/// A genuine transition of the settled sensor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: SensorState,
    pub to: SensorState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeFilter {
    last: SensorState,
}

impl ChangeFilter {
    /// Start with `baseline` as the last published state.
    pub const fn new(baseline: SensorState) -> Self {
        Self { last: baseline }
    }

    pub fn last(&self) -> SensorState {
        self.last
    }

    /// Compare a settled sample to the baseline.  On a difference the
    /// baseline moves to `candidate` and the change is returned.
    pub fn evaluate(&mut self, candidate: SensorState) -> Option<StateChange> {
        if candidate == self.last {
            return None;
        }
        let change = StateChange {
            from: self.last,
            to: candidate,
        };
        self.last = candidate;
        Some(change)
    }
}
