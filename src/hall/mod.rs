//! Hall sensor pipeline building blocks.
//!
//! ```text
//!  GPIO edge ─▶ EdgeDetector ─▶ EdgeSignal ─▶ DebounceWorker ─▶ ChangeFilter
//!  (ISR)                        (cap = 1)     (settle + read)    (dedupe)
//! ```
//!
//! Everything here is hardware-agnostic: the pin and delay come in through
//! `embedded-hal` traits, the interrupt flag through [`EdgeEventPort`].

pub mod debounce;
pub mod edge;
pub mod filter;
pub mod published;
pub mod signal;
pub mod state;

pub use debounce::{DebounceWorker, SamplePhase};
pub use edge::{EdgeDetector, EdgeEventPort};
pub use filter::{ChangeFilter, StateChange};
pub use published::PublishedState;
pub use signal::EdgeSignal;
pub use state::SensorState;
