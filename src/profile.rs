//! Per-job execution-time profiling.
//!
//! A [`Profile`] is attached to a job on demand and updated by the
//! dispatcher around each profiled callback invocation. Stopping profiling
//! freezes the record without discarding it; re-starting wipes it.

/// Timing statistics for one job, in microseconds of wall-clock time.
pub struct Profile {
    active: bool,
    last_micros: u32,
    best_micros: u32,
    worst_micros: u32,
    count: u32,
}

impl Profile {
    /// Fresh record: best-time starts at `u32::MAX` so the first real
    /// measurement always becomes the new best.
    pub(crate) fn new() -> Self {
        Self {
            active: true,
            last_micros: 0,
            best_micros: u32::MAX,
            worst_micros: 0,
            count: 0,
        }
    }

    pub(crate) fn record(&mut self, elapsed: u32) {
        self.last_micros = elapsed;
        self.best_micros = self.best_micros.min(elapsed);
        self.worst_micros = self.worst_micros.max(elapsed);
        self.count = self.count.wrapping_add(1);
    }

    pub(crate) fn stop(&mut self) {
        self.active = false;
    }

    /// Whether timing updates are still being recorded.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Duration of the most recent profiled invocation.
    pub fn last_micros(&self) -> u32 {
        self.last_micros
    }

    /// Shortest profiled invocation seen so far (`u32::MAX` until the
    /// first one).
    pub fn best_micros(&self) -> u32 {
        self.best_micros
    }

    /// Longest profiled invocation seen so far.
    pub fn worst_micros(&self) -> u32 {
        self.worst_micros
    }

    /// Number of profiled invocations recorded.
    pub fn execution_count(&self) -> u32 {
        self.count
    }
}

/// Elapsed time between two microsecond clock samples.
///
/// Uses `max − min` rather than `end − start`, which tolerates the clock
/// wrapping at most once between samples. Not a general rollover-safe
/// subtraction; kept as-is for parity with the original firmware scheduler
/// this crate derives from.
pub(crate) fn elapsed_micros(start: u32, end: u32) -> u32 {
    start.max(end) - start.min(end)
}
