//! Reproducible CSV emission format for sample real-time workloads.
//!
//! Not part of the scheduling core proper (spec §6 calls it out as "used
//! by sample workloads; not part of the core") but fixed here so every
//! workload that exercises `rt::api`/`rt::stats` emits byte-identical
//! rows. Built on `core::fmt::Write` so it works with or without `std`
//! and performs no allocation.

use core::fmt::{self, Write};

/// One completed (or missed) job, ready to be formatted as a CSV row.
#[derive(Debug, Clone, Copy)]
pub struct CsvRow {
    pub timestamp_ms: i64,
    pub task_id: u32,
    pub activation: u64,
    pub response_time_ms: i64,
    pub completion_ms: i64,
    pub deadline_ms: i64,
    pub period_ms: i64,
    pub weight: i64,
}

impl CsvRow {
    /// `deadline_met = 1` iff completion <= absolute deadline.
    pub fn deadline_met(&self) -> bool {
        self.completion_ms <= self.deadline_ms
    }

    /// `max(0, completion - deadline)` when missed, `0` when met.
    pub fn lateness_ms(&self) -> i64 {
        if self.deadline_met() {
            0
        } else {
            self.completion_ms - self.deadline_ms
        }
    }
}

/// Writes the fixed CSV header line (no trailing newline).
pub fn write_header<W: Write>(w: &mut W) -> fmt::Result {
    write!(
        w,
        "CSV_HEADER,timestamp,task_id,activation,response_time,deadline_met,lateness,period,deadline,weight"
    )
}

/// Writes one `CSV,...` data row (no trailing newline) for `row`.
pub fn write_row<W: Write>(w: &mut W, row: &CsvRow) -> fmt::Result {
    write!(
        w,
        "CSV,{},{},{},{},{},{},{},{},{}",
        row.timestamp_ms,
        row.task_id,
        row.activation,
        row.response_time_ms,
        row.deadline_met() as u8,
        row.lateness_ms(),
        row.period_ms,
        row.deadline_ms,
        row.weight,
    )
}
