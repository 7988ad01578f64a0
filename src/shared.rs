//! Sharing one scheduler between a tick interrupt and the main loop.
//!
//! The scheduler itself is a plain `&mut self` state machine with no
//! internal locking. Its two drivers run in different execution contexts —
//! the tick source is typically an interrupt handler, the dispatcher the
//! cooperative main loop — so every access must be serialized.
//! [`SharedScheduler`] packages that contract: each entry point takes a
//! critical section for the duration of the call.
//!
//! Note that [`SharedScheduler::service`] runs job callbacks with the
//! critical section held, so ticks are masked while a callback executes.
//! Keep callbacks short, or accept coarser tick timing during dispatch.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::sched::Scheduler;

/// A [`Scheduler`] behind a `critical-section` mutex, suitable for a
/// `static` shared between an ISR and the main loop.
///
/// ```no_run
/// use tick_sched::{Scheduler, SharedScheduler};
///
/// fn micros() -> u32 {
///     // read a hardware timer here
///     0
/// }
///
/// static SCHED: SharedScheduler = SharedScheduler::new(Scheduler::new(micros));
///
/// // from the periodic timer interrupt:
/// fn on_tick() {
///     SCHED.advance();
/// }
///
/// // from the main loop:
/// fn main_loop_iteration() {
///     SCHED.service();
/// }
/// ```
pub struct SharedScheduler {
    inner: Mutex<RefCell<Scheduler>>,
}

impl SharedScheduler {
    pub const fn new(sched: Scheduler) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(sched)),
        }
    }

    /// Tick entry point: advance all countdowns inside a critical section.
    pub fn advance(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).advance());
    }

    /// Dispatch entry point: run at most one due job inside a critical
    /// section.
    pub fn service(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).service());
    }

    /// Run any other scheduler operation inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut Scheduler) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }
}
