//! Scheduler core: job registry, PID allocation, and the two-phase
//! tick/dispatch protocol.
//!
//! Two call sites drive the scheduler at different cadences: a periodic
//! tick source calls [`Scheduler::advance`] (typically from an interrupt)
//! and the application's main loop calls [`Scheduler::service`].
//! `advance` only counts down and arms jobs; `service` executes **at most
//! one** due job per call, so the latency it adds to any single main-loop
//! iteration is bounded by one callback plus an O(jobs) scan. A backlog of
//! due jobs drains over successive `service` calls, earliest-created first.
//!
//! The two contexts must be serialized by the caller — on a single-core
//! target, wrap the scheduler in [`crate::shared::SharedScheduler`].

use alloc::vec::Vec;
use core::fmt;

use crate::job::{Callback, FOREVER, Job, NO_PID, Pid};
use crate::profile::{Profile, elapsed_micros};

/// Why a job could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateError {
    /// Periods must be greater than one tick.
    InvalidPeriod,
    /// The registry could not grow; the scheduler is unchanged.
    OutOfMemory,
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateError::InvalidPeriod => write!(f, "period must be > 1 tick"),
            CreateError::OutOfMemory => write!(f, "could not allocate job"),
        }
    }
}

/// Cooperative tick-driven task scheduler.
///
/// Owns all job storage. PIDs are issued monotonically, skipping the
/// reserved zero value; after 2^32 allocations the counter wraps and a PID
/// held by a very long-lived job could be reissued — no collision scan is
/// performed.
pub struct Scheduler {
    jobs: Vec<Job>,
    next_pid: Pid,
    /// PID of the job whose callback is on the stack right now, or
    /// [`NO_PID`]. A job is never destroyed while it is executing; removal
    /// is deferred to the terminal-firing path instead.
    executing: Pid,
    clock: fn() -> u32,
    total_loops: u32,
    productive_loops: u32,
    overhead_micros: u32,
}

impl Scheduler {
    /// New empty scheduler. `clock` is a monotonic microsecond source used
    /// by the profiler and the `service` overhead counter — on real
    /// hardware a timer read, in tests a fake.
    pub const fn new(clock: fn() -> u32) -> Self {
        Self {
            jobs: Vec::new(),
            next_pid: 1,
            executing: NO_PID,
            clock,
            total_loops: 0,
            productive_loops: 0,
            overhead_micros: 0,
        }
    }

    fn job(&self, pid: Pid) -> Option<&Job> {
        self.jobs.iter().find(|j| j.pid == pid)
    }

    fn job_mut(&mut self, pid: Pid) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.pid == pid)
    }

    fn alloc_pid(&mut self) -> Pid {
        loop {
            let pid = self.next_pid;
            self.next_pid = self.next_pid.wrapping_add(1);
            if pid != NO_PID {
                return pid;
            }
        }
    }

    // ── Registry ────────────────────────────────────────────────────────

    /// Create a job. It is enabled immediately with a full countdown and
    /// first becomes due `period` ticks from now.
    ///
    /// `recurs`: [`FOREVER`] to run indefinitely, `N > 0` to fire `N + 1`
    /// times, `0` to fire exactly once more. `autoclear` removes (rather
    /// than disables) the job once `recurs` is exhausted.
    pub fn create(
        &mut self,
        period: u32,
        recurs: i16,
        autoclear: bool,
        callback: Callback,
    ) -> Result<Pid, CreateError> {
        if period <= 1 {
            log::warn!("sched: create rejected, period {period} too short");
            return Err(CreateError::InvalidPeriod);
        }
        if self.jobs.try_reserve(1).is_err() {
            log::warn!("sched: create rejected, out of memory");
            return Err(CreateError::OutOfMemory);
        }
        let pid = self.alloc_pid();
        self.jobs.push(Job {
            pid,
            period,
            ttw: period,
            recurs,
            enabled: true,
            due: false,
            autoclear,
            callback: Some(callback),
            profile: None,
        });
        log::debug!("sched: created job {pid} (period {period}, recurs {recurs})");
        Ok(pid)
    }

    /// Remove a job and any attached profiling data.
    ///
    /// Called on the currently-executing PID (i.e. from inside that job's
    /// own callback), nothing is destroyed; the job is marked
    /// `autoclear, recurs = 0` so the dispatcher reaps it through the
    /// normal terminal-firing path once the callback returns.
    /// Returns `false` if the PID is unknown.
    pub fn remove(&mut self, pid: Pid) -> bool {
        if pid == self.executing {
            match self.job_mut(pid) {
                Some(job) => {
                    job.autoclear = true;
                    job.recurs = 0;
                    log::debug!("sched: removal of executing job {pid} deferred");
                    true
                }
                None => false,
            }
        } else {
            self.destroy(pid)
        }
    }

    fn destroy(&mut self, pid: Pid) -> bool {
        match self.jobs.iter().position(|j| j.pid == pid) {
            Some(i) => {
                self.jobs.remove(i);
                log::debug!("sched: removed job {pid}");
                true
            }
            None => false,
        }
    }

    /// Number of jobs currently defined, enabled or not.
    pub fn total_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Number of jobs currently enabled.
    pub fn active_jobs(&self) -> usize {
        self.jobs.iter().filter(|j| j.enabled).count()
    }

    /// The PID the allocator will issue next.
    pub fn peek_next_pid(&self) -> Pid {
        self.next_pid
    }

    pub fn is_enabled(&self, pid: Pid) -> bool {
        self.job(pid).is_some_and(|j| j.enabled)
    }

    /// Whether the job exists, is enabled, and has at least one firing
    /// left before it might be disabled or reaped.
    pub fn will_run_again(&self, pid: Pid) -> bool {
        self.job(pid)
            .is_some_and(|j| j.enabled && (j.recurs == FOREVER || j.recurs > 0))
    }

    pub(crate) fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    // ── Alteration ──────────────────────────────────────────────────────

    /// Reconfigure every parameter of an existing job. Clears any pending
    /// firing and restarts the countdown under the new period — a job
    /// mid-flight never fires on stale parameters.
    pub fn alter(
        &mut self,
        pid: Pid,
        period: u32,
        recurs: i16,
        autoclear: bool,
        callback: Callback,
    ) -> bool {
        if period <= 1 {
            return false;
        }
        match self.job_mut(pid) {
            Some(job) => {
                job.due = false;
                job.period = period;
                job.ttw = period;
                job.recurs = recurs;
                job.autoclear = autoclear;
                job.callback = Some(callback);
                true
            }
            None => false,
        }
    }

    /// Change a job's period. Clears any pending firing and restarts the
    /// countdown at the new period.
    pub fn set_period(&mut self, pid: Pid, period: u32) -> bool {
        if period <= 1 {
            return false;
        }
        match self.job_mut(pid) {
            Some(job) => {
                job.due = false;
                job.period = period;
                job.ttw = period;
                true
            }
            None => false,
        }
    }

    /// Change a job's remaining repeat count. Clears any pending firing.
    pub fn set_recurrence(&mut self, pid: Pid, recurs: i16) -> bool {
        match self.job_mut(pid) {
            Some(job) => {
                job.due = false;
                job.recurs = recurs;
                true
            }
            None => false,
        }
    }

    pub fn set_autoclear(&mut self, pid: Pid, autoclear: bool) -> bool {
        match self.job_mut(pid) {
            Some(job) => {
                job.autoclear = autoclear;
                true
            }
            None => false,
        }
    }

    /// Swap a job's callback. Clears any pending firing and restarts the
    /// countdown, so the new callback never runs off the old schedule.
    pub fn set_callback(&mut self, pid: Pid, callback: Callback) -> bool {
        match self.job_mut(pid) {
            Some(job) => {
                job.due = false;
                job.ttw = job.period;
                job.callback = Some(callback);
                true
            }
            None => false,
        }
    }

    pub fn enable(&mut self, pid: Pid) -> bool {
        match self.job_mut(pid) {
            Some(job) => {
                job.enabled = true;
                true
            }
            None => false,
        }
    }

    /// Stop ticking a job. The countdown is reset to a full period so a
    /// later [`enable`](Self::enable) never fires sooner than one full
    /// period after re-enabling.
    pub fn disable(&mut self, pid: Pid) -> bool {
        match self.job_mut(pid) {
            Some(job) => {
                job.enabled = false;
                job.due = false;
                job.ttw = job.period;
                true
            }
            None => false,
        }
    }

    /// Override the job's countdown for one cycle only (the value may
    /// exceed the period) and force-enable it. After the next firing the
    /// countdown reverts to the job's normal period.
    pub fn delay(&mut self, pid: Pid, ticks: u32) -> bool {
        match self.job_mut(pid) {
            Some(job) => {
                job.ttw = ticks;
                job.enabled = true;
                true
            }
            None => false,
        }
    }

    /// Reset the job's countdown to its period and force-enable it.
    pub fn rearm(&mut self, pid: Pid) -> bool {
        match self.job_mut(pid) {
            Some(job) => {
                job.ttw = job.period;
                job.enabled = true;
                true
            }
            None => false,
        }
    }

    // ── Tick advancer ───────────────────────────────────────────────────

    /// Push every enabled job's countdown forward by one tick; a job whose
    /// countdown reaches zero is flagged due and its countdown re-armed.
    ///
    /// Called by the periodic tick source. O(jobs), allocation-free —
    /// safe inside a tight periodic interrupt.
    pub fn advance(&mut self) {
        for job in &mut self.jobs {
            if !job.enabled {
                continue;
            }
            job.ttw = job.ttw.saturating_sub(1);
            if job.ttw == 0 {
                job.due = true;
                job.ttw = job.period;
            }
        }
    }

    // ── Dispatcher ──────────────────────────────────────────────────────

    /// Execute the first due job in creation order, if any. At most one
    /// job runs per call; call repeatedly from the main loop to drain a
    /// backlog. Earlier-created jobs are de facto higher priority.
    ///
    /// Not re-entrant: a callback that calls `service` again can dispatch
    /// *other* due jobs, never itself.
    pub fn service(&mut self) {
        let origin = (self.clock)();
        self.total_loops = self.total_loops.wrapping_add(1);

        // A job whose callback is checked out is mid-dispatch further up
        // the stack and is not dispatchable.
        let slot = self
            .jobs
            .iter()
            .position(|j| j.due && j.callback.is_some());
        if let Some(slot) = slot {
            let pid = self.jobs[slot].pid;
            let profiled = self.jobs[slot]
                .profile
                .as_ref()
                .is_some_and(|p| p.is_active());
            if let Some(mut callback) = self.jobs[slot].callback.take() {
                let start = if profiled { (self.clock)() } else { 0 };

                self.executing = pid;
                callback(self, pid);
                self.executing = NO_PID;

                let end = if profiled { (self.clock)() } else { 0 };

                // The callback may have altered or removed jobs; find this
                // one again by PID before touching its state.
                let mut reap = false;
                if let Some(job) = self.jobs.iter_mut().find(|j| j.pid == pid) {
                    if profiled {
                        if let Some(p) = job.profile.as_mut() {
                            if p.is_active() {
                                p.record(elapsed_micros(start, end));
                            }
                        }
                    }
                    // Restore the callback unless the job swapped it in
                    // its own slot while it ran.
                    if job.callback.is_none() {
                        job.callback = Some(callback);
                    }
                    job.due = false;
                    match job.recurs {
                        FOREVER => {}
                        0 => {
                            if job.autoclear {
                                reap = true;
                            } else {
                                job.enabled = false;
                                job.ttw = job.period;
                            }
                        }
                        _ => job.recurs -= 1,
                    }
                }
                if reap {
                    self.destroy(pid);
                }
                self.productive_loops = self.productive_loops.wrapping_add(1);
            }
        }

        self.overhead_micros = (self.clock)().wrapping_sub(origin);
    }

    // ── Diagnostics counters ────────────────────────────────────────────

    /// Total calls to [`service`](Self::service).
    pub fn total_loops(&self) -> u32 {
        self.total_loops
    }

    /// Calls to [`service`](Self::service) that actually dispatched a job.
    pub fn productive_loops(&self) -> u32 {
        self.productive_loops
    }

    /// Microseconds spent inside the most recent
    /// [`service`](Self::service) call, callback included.
    pub fn overhead_micros(&self) -> u32 {
        self.overhead_micros
    }

    // ── Profiler ────────────────────────────────────────────────────────

    /// Attach a fresh profiling record to a job. A no-op while an active
    /// record exists; re-starting after
    /// [`stop_profiling`](Self::stop_profiling) replaces the frozen record
    /// with a fresh one.
    pub fn begin_profiling(&mut self, pid: Pid) {
        if let Some(job) = self.job_mut(pid) {
            match &job.profile {
                Some(p) if p.is_active() => {}
                _ => job.profile = Some(Profile::new()),
            }
        }
    }

    /// Freeze a job's profiling record without discarding the data.
    pub fn stop_profiling(&mut self, pid: Pid) {
        if let Some(job) = self.job_mut(pid) {
            if let Some(p) = job.profile.as_mut() {
                p.stop();
            }
        }
    }

    /// Detach and discard a job's profiling record.
    pub fn clear_profiling(&mut self, pid: Pid) {
        if let Some(job) = self.job_mut(pid) {
            job.profile = None;
        }
    }

    /// Whether the job is currently being actively profiled.
    pub fn is_profiling(&self, pid: Pid) -> bool {
        self.job(pid)
            .and_then(|j| j.profile.as_ref())
            .is_some_and(|p| p.is_active())
    }

    /// The job's profiling record, if one is attached (active or frozen).
    pub fn profile(&self, pid: Pid) -> Option<&Profile> {
        self.job(pid).and_then(|j| j.profile.as_ref())
    }
}
