use std::fmt;
use std::time::Duration;

/// Wall-clock time spent in each phase of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTimings {
    pub load: Duration,
    pub compute: Duration,
    pub write: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.load + self.compute + self.write
    }
}

/// Outcome of one `multiply` run, in the shape benchmark scripts consume.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rows: usize,
    /// Worker count as requested on the command line.
    pub workers: usize,
    /// Workers that actually received rows.
    pub active_workers: usize,
    pub timings: PhaseTimings,
    /// Start of the run, milliseconds since the Unix epoch.
    pub started_at: i64,
}

/// Tab-separated `rows workers load compute write total`, seconds with six
/// decimals.
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.timings;
        write!(
            f,
            "{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            self.rows,
            self.workers,
            t.load.as_secs_f64(),
            t.compute.as_secs_f64(),
            t.write.as_secs_f64(),
            t.total().as_secs_f64()
        )
    }
}
