//! Peer link bookkeeping: the connection slot and the notify path.

pub mod handle;
pub mod notifier;
pub mod tracker;

pub use handle::{ConnHandle, PeerAddr};
pub use notifier::{Notifier, NotifyOutcome};
pub use tracker::{ConnectionTracker, LinkState, LinkTransition};
