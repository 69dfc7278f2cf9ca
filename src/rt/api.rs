//! RT parameter and statistics API consumed by applications: free
//! functions over `ThreadId` plus the global scheduler, in the same style
//! as `crate::sync::yield_thread`/`crate::sync::exit_thread`.

use crate::error::ThreadResult;
use crate::scheduler::Scheduler;
use crate::thread::ThreadId;

use super::params;
use super::stats::{self, RtStats};

/// Sets `deadline(t) = now + relative_deadline` and resets `time_left` to
/// the thread's current `exec_time`, marking the start of a fresh period.
pub fn set_deadline(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    relative_deadline: i64,
    now: i64,
) -> ThreadResult<()> {
    let absolute = now.saturating_add(relative_deadline);
    params::set_deadline_and_reset_budget(scheduler, thread_id, absolute)
}

/// Sets `deadline(t)` to an absolute cycle value and resets `time_left`.
pub fn set_absolute_deadline(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    absolute_deadline: i64,
) -> ThreadResult<()> {
    params::set_deadline_and_reset_budget(scheduler, thread_id, absolute_deadline)
}

pub fn weight_get(scheduler: &Scheduler, thread_id: ThreadId) -> ThreadResult<i64> {
    params::weight_get(scheduler, thread_id)
}

pub fn weight_set(scheduler: &mut Scheduler, thread_id: ThreadId, weight: i64) -> ThreadResult<()> {
    params::weight_set(scheduler, thread_id, weight)
}

pub fn exec_time_get(scheduler: &Scheduler, thread_id: ThreadId) -> ThreadResult<i64> {
    params::exec_time_get(scheduler, thread_id)
}

pub fn exec_time_set(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    exec_time: i64,
) -> ThreadResult<()> {
    params::exec_time_set(scheduler, thread_id, exec_time)
}

pub fn time_left_get(scheduler: &Scheduler, thread_id: ThreadId) -> ThreadResult<i64> {
    params::time_left_get(scheduler, thread_id)
}

pub fn time_left_set(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    time_left: i64,
) -> ThreadResult<()> {
    params::time_left_set(scheduler, thread_id, time_left)
}

/// Convenience call composing the three setters a periodic task's setup
/// code almost always wants together: a deadline one period out, the
/// budgeted execution time, and a scheduling weight.
pub fn rt_config(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    period: i64,
    exec_time: i64,
    weight: i64,
    now: i64,
) -> ThreadResult<()> {
    set_deadline(scheduler, thread_id, period, now)?;
    params::exec_time_set(scheduler, thread_id, exec_time)?;
    params::weight_set(scheduler, thread_id, weight)
}

/// Ends `thread_id`'s current job and cooperatively suspends it until
/// `next_release` (an absolute cycle count), firing the job-completion
/// statistics hook. This is the RT-facing entry point for the host
/// kernel's sleep-until-absolute-time primitive (spec §5); it does not
/// touch `deadline` itself — advance the period separately with
/// `set_absolute_deadline(thread, prior_deadline + period)`, exactly as
/// spec.md's periodic-task idiom describes.
pub fn end_of_job(
    scheduler: &mut Scheduler,
    thread_id: ThreadId,
    next_release: i64,
) -> ThreadResult<()> {
    scheduler.sleep_current_thread_until(thread_id, next_release)
}

/// Application marks the start of a new job for `thread_id`.
pub fn mark_activation(scheduler: &mut Scheduler, thread_id: ThreadId, now: i64) -> ThreadResult<()> {
    let thread = scheduler
        .get_thread_mut(thread_id)
        .ok_or(crate::error::ThreadError::InvalidThreadId)?;
    stats::on_activation(thread, now);
    Ok(())
}

/// Application reports that `thread_id` missed its deadline.
pub fn mark_deadline_miss(scheduler: &mut Scheduler, thread_id: ThreadId) -> ThreadResult<()> {
    let thread = scheduler
        .get_thread_mut(thread_id)
        .ok_or(crate::error::ThreadError::InvalidThreadId)?;
    stats::on_deadline_miss(thread);
    Ok(())
}

/// Reports a priority inversion observed while `thread_id` waited on a
/// lower-priority lock holder. No internal code path calls this; it is
/// meant to be wired up by a priority-aware mutex implementation.
pub fn mark_priority_inversion(scheduler: &mut Scheduler, thread_id: ThreadId) -> ThreadResult<()> {
    let thread = scheduler
        .get_thread_mut(thread_id)
        .ok_or(crate::error::ThreadError::InvalidThreadId)?;
    stats::mark_priority_inversion(thread);
    Ok(())
}

pub fn stats_get(scheduler: &Scheduler, thread_id: ThreadId) -> RtStats {
    stats::stats_get(scheduler, thread_id)
}

pub fn stats_reset(scheduler: &mut Scheduler, thread_id: ThreadId) -> ThreadResult<()> {
    stats::stats_reset(scheduler, thread_id)
}
