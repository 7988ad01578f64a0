// tick-sched: cooperative tick-driven task scheduler for no_std targets
//
// A periodic tick source (usually a timer interrupt) calls advance() to
// count every enabled job down; the application main loop calls service(),
// which executes at most one due job per call. One callback per loop
// iteration is the latency ceiling this trades throughput for.
//
// job:     per-job record, PID type, repeat-count constants
// profile: per-job execution-time profiling record
// sched:   scheduler core (registry, tick advancer, dispatcher)
// dump:    human-readable status/profile dumps
// shared:  critical-section wrapper for the ISR/main-loop split

#![no_std]

extern crate alloc;

pub mod job;
pub mod profile;
pub mod sched;
pub mod shared;

mod dump;

pub use job::{Callback, FOREVER, NO_PID, Pid};
pub use profile::Profile;
pub use sched::{CreateError, Scheduler};
pub use shared::SharedScheduler;
