//! Interrupt-to-worker wake signal.
//!
//! A binary event with at most one outstanding unit.  The ISR posts, the
//! worker consumes.  Posting while a unit is already pending coalesces into
//! the pending unit, so a burst of edges wakes the worker exactly once.
//!
//! ```text
//!  hall ISR ──post()──▶ ┌──────────────┐ ──wait_blocking()──▶ debounce worker
//!  on_connected ──────▶ │ EdgeSignal(1)│
//!                       └──────────────┘
//! ```
//!
//! The unit is a single atomic flag.  `post()` sets it and, on the
//! empty → pending transition, rings the waiter's doorbell.  The doorbell
//! never runs waiter code in the poster's context:
//!
//! - **`target_os = "espidf"`**: a FreeRTOS task notification to the worker
//!   task (`xTaskNotifyFromISR` when called from the GPIO ISR).
//! - **host**: `Thread::unpark` on the worker thread.
//!
//! Single consumer: the first thread to wait owns the doorbell.

use core::sync::atomic::{AtomicBool, Ordering};

pub struct EdgeSignal {
    pending: AtomicBool,
    waiter: Waiter,
}

impl EdgeSignal {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            waiter: Waiter::new(),
        }
    }

    /// Make one wake-up unit available.  Safe to call from interrupt
    /// context; idempotent while a unit is already pending.
    pub fn post(&self) {
        if !self.pending.swap(true, Ordering::AcqRel) {
            self.waiter.ring();
        }
    }

    /// Block the calling thread until a unit is available, then consume it.
    /// No timeout: the worker sleeps here until the next edge.
    pub fn wait_blocking(&self) {
        self.waiter.register();
        while !self.try_take() {
            self.waiter.park();
        }
    }

    /// Consume the pending unit if there is one, without blocking.
    pub fn try_take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a unit is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for EdgeSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ── Doorbell ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
struct Waiter {
    task: core::sync::atomic::AtomicPtr<core::ffi::c_void>,
}

#[cfg(target_os = "espidf")]
impl Waiter {
    const fn new() -> Self {
        Self {
            task: core::sync::atomic::AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    fn register(&self) {
        if let Some(handle) = esp_idf_hal::task::current() {
            self.task.store(handle.cast(), Ordering::Release);
        }
    }

    fn ring(&self) {
        let task = self.task.load(Ordering::Acquire);
        if task.is_null() {
            // Worker not waiting yet; it checks the flag before parking.
            return;
        }
        // SAFETY: the handle was stored by the worker task, which never
        // exits.  notify_and_yield picks the FromISR variant in interrupt
        // context and takes no locks.
        unsafe {
            esp_idf_hal::task::notify_and_yield(task.cast(), core::num::NonZeroU32::MIN);
        }
    }

    fn park(&self) {
        // The notification value latches, so a ring between the flag check
        // and this call returns immediately.
        let _ = esp_idf_hal::task::wait_notification(esp_idf_hal::delay::BLOCK);
    }
}

#[cfg(not(target_os = "espidf"))]
struct Waiter {
    thread: std::sync::OnceLock<std::thread::Thread>,
}

#[cfg(not(target_os = "espidf"))]
impl Waiter {
    const fn new() -> Self {
        Self {
            thread: std::sync::OnceLock::new(),
        }
    }

    fn register(&self) {
        let owner = self.thread.get_or_init(std::thread::current);
        debug_assert_eq!(owner.id(), std::thread::current().id(), "EdgeSignal has one consumer");
    }

    fn ring(&self) {
        if let Some(thread) = self.thread.get() {
            thread.unpark();
        }
    }

    fn park(&self) {
        // Spurious returns are fine; the caller re-checks the flag.
        std::thread::park();
    }
}
