//! Notifier — pushes a changed state to the connected peer, if any.
//!
//! Last value wins: with no peer the change is dropped, and a failed send is
//! not retried.  A peer that reconnects reads the characteristic instead.

use log::{debug, info, warn};

use super::tracker::ConnectionTracker;
use crate::app::ports::{Attribute, LinkPort};
use crate::error::LinkError;
use crate::hall::SensorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent { conn_id: u16 },
    NoPeer,
    Failed(LinkError),
}

pub struct Notifier {
    attr: Attribute,
}

impl Notifier {
    pub const fn new(attr: Attribute) -> Self {
        Self { attr }
    }

    pub fn attribute(&self) -> Attribute {
        self.attr
    }

    pub fn publish(
        &self,
        state: SensorState,
        tracker: &ConnectionTracker,
        link: &mut impl LinkPort,
    ) -> NotifyOutcome {
        let Some(conn) = tracker.current() else {
            debug!("notify: no peer, dropping {:?}", state);
            return NotifyOutcome::NoPeer;
        };

        let payload = [state.payload()];
        match link.notify(&conn, self.attr, &payload) {
            Ok(()) => {
                info!(
                    "notify: '{}' -> conn {}",
                    char::from(payload[0]),
                    conn.conn_id()
                );
                NotifyOutcome::Sent {
                    conn_id: conn.conn_id(),
                }
            }
            Err(e) => {
                warn!("notify: conn {} failed ({}), not retrying", conn.conn_id(), e);
                NotifyOutcome::Failed(e)
            }
        }
    }
}
