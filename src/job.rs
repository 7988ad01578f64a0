//! Per-job record, PID type, and repeat-count constants.

use alloc::boxed::Box;

use crate::profile::Profile;
use crate::sched::Scheduler;

/// Process identifier: the unique handle for a live job. Never zero.
pub type Pid = u32;

/// The reserved "no job" PID. Never assigned to a live job.
pub const NO_PID: Pid = 0;

/// Repeat count meaning "run for as long as the job stays enabled".
pub const FOREVER: i16 = -1;

/// A job's unit of work.
///
/// Invoked by [`Scheduler::service`] with the scheduler itself and the
/// executing job's PID, so a callback can create, alter, or remove jobs —
/// including requesting its own removal. `Send` is required so a scheduler
/// can live in a `static` shared with an interrupt context
/// (see [`crate::shared`]).
pub type Callback = Box<dyn FnMut(&mut Scheduler, Pid) + Send>;

/// One schedule entry. Owned by the scheduler's registry; insertion order
/// is dispatch order.
pub(crate) struct Job {
    pub(crate) pid: Pid,
    /// Ticks between firings. Always > 1.
    pub(crate) period: u32,
    /// Ticks remaining until the next firing.
    pub(crate) ttw: u32,
    /// −1 = forever, 0 = one firing left, N > 0 = N more after the next.
    pub(crate) recurs: i16,
    pub(crate) enabled: bool,
    /// Set by the tick advancer, cleared by the dispatcher.
    pub(crate) due: bool,
    /// Remove (rather than disable) the job once `recurs` is exhausted.
    pub(crate) autoclear: bool,
    /// `None` only while the dispatcher has the callback checked out.
    pub(crate) callback: Option<Callback>,
    pub(crate) profile: Option<Profile>,
}
