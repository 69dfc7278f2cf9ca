//! Per-thread real-time parameter block and the re-keying protocol.
//!
//! Every setter here runs under the scheduler-exclusion lock (the caller
//! holds `&mut Scheduler`, obtained through `SchedulerCell::get` exactly as
//! `crate::scheduler`'s own methods do) and follows the same remove →
//! mutate → reinsert sequence so a resident thread's comparator key never
//! goes stale while it sits in the ready queue.

use crate::error::{ThreadError, ThreadResult};
use crate::scheduler::Scheduler;
use crate::thread::ThreadId;

/// Real-time scheduling parameters carried by every thread.
///
/// All fields are native `i64` cycle counts (see GLOSSARY: "native
/// signed-integer cycle space"), mutated only while the scheduler
/// exclusion lock is held and read back via a plain struct copy.
#[derive(Debug, Clone, Copy)]
pub struct RtParams {
    pub deadline: i64,
    pub weight: i64,
    pub exec_time: i64,
    pub time_left: i64,
    pub accumulated_runtime: i64,
    /// Cycle time at which this thread was last dispatched; internal
    /// bookkeeping for `accrue`, not part of the public parameter set.
    dispatched_at: i64,
}

impl RtParams {
    pub const fn new() -> Self {
        Self {
            deadline: 0,
            weight: 1,
            exec_time: 0,
            time_left: 0,
            accumulated_runtime: 0,
            dispatched_at: 0,
        }
    }

    /// Weight clamped to at least 1, so every weighted comparator can
    /// divide by it without special-casing zero or negative misuse.
    pub fn effective_weight(&self) -> i64 {
        if self.weight <= 0 {
            1
        } else {
            self.weight
        }
    }
}

impl Default for RtParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Records that `params` has just been dispatched onto the CPU at `now`.
///
/// Called unconditionally from `Scheduler` on every context-switch-in, so
/// `accrue` can later compute exactly how long the thread actually ran.
pub(crate) fn mark_dispatched(params: &mut RtParams, now: i64) {
    params.dispatched_at = now;
}

/// Folds the cycles spent running since the last `mark_dispatched` into
/// `accumulated_runtime` (needed by PFS regardless of build configuration)
/// and, when thread-runtime-usage tracking is enabled, drains `time_left`
/// by the same amount (needed by WSRT and LLF).
pub(crate) fn accrue(params: &mut RtParams, now: i64) {
    let elapsed = (now - params.dispatched_at).max(0);
    params.accumulated_runtime = params.accumulated_runtime.saturating_add(elapsed);

    #[cfg(feature = "runtime-usage-tracking")]
    {
        params.time_left = (params.time_left - elapsed).max(0);
    }
    #[cfg(not(feature = "runtime-usage-tracking"))]
    {
        let _ = elapsed;
    }
}

/// Removes `thread_id` from the ready queue if present, runs `mutate`
/// against its RT parameter block, then reinserts it. Threads that are
/// not currently ready (running, blocked, or finished) are mutated
/// in place with no queue traffic.
fn rekey(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    mutate: impl FnOnce(&mut RtParams),
) -> ThreadResult<()> {
    let was_queued = scheduler.remove_from_ready_queue(thread_id);

    {
        let thread = scheduler
            .get_thread_mut(thread_id)
            .ok_or(ThreadError::InvalidThreadId)?;
        mutate(&mut thread.rt);
    }

    if was_queued {
        scheduler.reinsert_ready_queue(thread_id)?;
    }

    log::trace!("rt_params: rekeyed thread {}", thread_id);
    Ok(())
}

pub fn deadline_get(scheduler: &Scheduler, thread_id: ThreadId) -> ThreadResult<i64> {
    scheduler
        .get_thread(thread_id)
        .map(|t| t.rt.deadline)
        .ok_or(ThreadError::InvalidThreadId)
}

pub fn weight_get(scheduler: &Scheduler, thread_id: ThreadId) -> ThreadResult<i64> {
    scheduler
        .get_thread(thread_id)
        .map(|t| t.rt.weight)
        .ok_or(ThreadError::InvalidThreadId)
}

pub fn weight_set(scheduler: &mut Scheduler, thread_id: ThreadId, weight: i64) -> ThreadResult<()> {
    rekey(scheduler, thread_id, |p| p.weight = weight)
}

pub fn exec_time_get(scheduler: &Scheduler, thread_id: ThreadId) -> ThreadResult<i64> {
    scheduler
        .get_thread(thread_id)
        .map(|t| t.rt.exec_time)
        .ok_or(ThreadError::InvalidThreadId)
}

pub fn exec_time_set(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    exec_time: i64,
) -> ThreadResult<()> {
    rekey(scheduler, thread_id, |p| p.exec_time = exec_time)
}

pub fn time_left_get(scheduler: &Scheduler, thread_id: ThreadId) -> ThreadResult<i64> {
    scheduler
        .get_thread(thread_id)
        .map(|t| t.rt.time_left)
        .ok_or(ThreadError::InvalidThreadId)
}

pub fn time_left_set(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    time_left: i64,
) -> ThreadResult<()> {
    rekey(scheduler, thread_id, |p| p.time_left = time_left)
}

/// Sets `deadline` directly and resets `time_left` to `exec_time`, used by
/// `rt::api::set_deadline`/`set_absolute_deadline` so every new period
/// starts with a fresh remaining-execution-time budget.
pub(crate) fn set_deadline_and_reset_budget(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    deadline: i64,
) -> ThreadResult<()> {
    let exec_time = scheduler
        .get_thread(thread_id)
        .ok_or(ThreadError::InvalidThreadId)?
        .rt
        .exec_time;

    rekey(scheduler, thread_id, |p| {
        p.deadline = deadline;
        p.time_left = exec_time;
    })
}
