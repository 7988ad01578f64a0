//! Human-readable status and profiling dumps.
//!
//! Pure string rendering over registry state, meant to be handed to
//! whatever logging sink the application uses. Nothing in the scheduler
//! depends on these; they cost an allocation per call.

use alloc::string::String;
use core::fmt::Write;

use crate::job::Pid;
use crate::sched::Scheduler;

const SCHEDULE_HEADER: &str = "[PID, ENABLED, TTF, PERIOD, RECURS, PENDING, AUTOCLEAR, PROFILED]\n";
const PROFILER_HEADER: &str = "[PID, PROFILING, EXECUTED, LAST, BEST, WORST]\n";
const NO_SCHEDULES: &str = "NO SCHEDULES";

#[derive(Clone, Copy)]
enum Filter {
    All,
    Enabled,
    One(Pid),
}

fn yes_no(v: bool) -> &'static str {
    if v { "YES" } else { "NO" }
}

impl Scheduler {
    /// Dump every job, enabled or not.
    pub fn dump_schedules(&self) -> String {
        self.dump_schedule_rows(Filter::All)
    }

    /// Dump only the jobs the tick advancer is currently counting down.
    pub fn dump_enabled_schedules(&self) -> String {
        self.dump_schedule_rows(Filter::Enabled)
    }

    /// Dump the single job with the given PID.
    pub fn dump_schedule(&self, pid: Pid) -> String {
        self.dump_schedule_rows(Filter::One(pid))
    }

    fn dump_schedule_rows(&self, filter: Filter) -> String {
        if self.total_jobs() == 0 {
            return String::from(NO_SCHEDULES);
        }
        let mut out = String::from(SCHEDULE_HEADER);
        for job in self.jobs() {
            let keep = match filter {
                Filter::All => true,
                Filter::Enabled => job.enabled,
                Filter::One(pid) => job.pid == pid,
            };
            if !keep {
                continue;
            }
            let profiled = job.profile.as_ref().is_some_and(|p| p.is_active());
            let _ = writeln!(
                out,
                "[{}, {}, {}, {}, {}, {}, {}, {}]",
                job.pid,
                yes_no(job.enabled),
                job.ttw,
                job.period,
                job.recurs,
                yes_no(job.due),
                yes_no(job.autoclear),
                yes_no(profiled),
            );
        }
        out
    }

    /// Dump profiling data for every job carrying a record.
    pub fn dump_profiles(&self) -> String {
        self.dump_profile_rows(Filter::All)
    }

    /// Dump profiling data for the single job with the given PID.
    pub fn dump_profile(&self, pid: Pid) -> String {
        self.dump_profile_rows(Filter::One(pid))
    }

    fn dump_profile_rows(&self, filter: Filter) -> String {
        if self.total_jobs() == 0 {
            return String::from(NO_SCHEDULES);
        }
        let mut out = String::from(PROFILER_HEADER);
        for job in self.jobs() {
            let keep = match filter {
                Filter::All | Filter::Enabled => true,
                Filter::One(pid) => job.pid == pid,
            };
            let Some(profile) = job.profile.as_ref() else {
                continue;
            };
            if !keep {
                continue;
            }
            let _ = writeln!(
                out,
                "[{}, {}, {}, {}, {}, {}]",
                job.pid,
                yes_no(profile.is_active()),
                profile.execution_count(),
                profile.last_micros(),
                profile.best_micros(),
                profile.worst_micros(),
            );
        }
        out
    }
}
