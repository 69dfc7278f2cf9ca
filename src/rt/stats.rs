//! RT accounting: per-thread counters and response/waiting/execution
//! aggregates, updated exclusively from the five instrumentation hooks.

use crate::error::ThreadResult;
use crate::scheduler::Scheduler;
use crate::thread::{Thread, ThreadId};

/// Real-time accounting block carried by every thread.
///
/// Counters and the basic total/min/max aggregates are always present.
/// `rt-stats-squared` additionally tracks sums of squares so `variance`/
/// `stddev` can be derived; `rt-stats-detailed` exposes the raw
/// last-event timestamps that the aggregates are internally computed
/// from (the timestamps themselves are tracked unconditionally, since
/// the basic aggregates cannot be computed without them).
#[derive(Debug, Clone, Copy, Default)]
pub struct RtStats {
    pub activations: u64,
    pub completions: u64,
    pub preemptions: u64,
    pub context_switches: u64,
    pub deadline_misses: u64,
    pub priority_inversions: u64,

    pub response_total: u64,
    pub response_min: u64,
    pub response_max: u64,
    #[cfg(feature = "rt-stats-squared")]
    pub response_sum_sq: u64,

    pub waiting_total: u64,
    pub waiting_min: u64,
    pub waiting_max: u64,
    #[cfg(feature = "rt-stats-squared")]
    pub waiting_sum_sq: u64,

    pub execution_total: u64,
    pub execution_min: u64,
    pub execution_max: u64,
    #[cfg(feature = "rt-stats-squared")]
    pub execution_sum_sq: u64,

    last_activation_time: i64,
    last_ready_time: i64,
    last_start_time: i64,
    last_completion_time: i64,
}

impl RtStats {
    pub const fn new() -> Self {
        Self {
            activations: 0,
            completions: 0,
            preemptions: 0,
            context_switches: 0,
            deadline_misses: 0,
            priority_inversions: 0,
            response_total: 0,
            response_min: 0,
            response_max: 0,
            #[cfg(feature = "rt-stats-squared")]
            response_sum_sq: 0,
            waiting_total: 0,
            waiting_min: 0,
            waiting_max: 0,
            #[cfg(feature = "rt-stats-squared")]
            waiting_sum_sq: 0,
            execution_total: 0,
            execution_min: 0,
            execution_max: 0,
            #[cfg(feature = "rt-stats-squared")]
            execution_sum_sq: 0,
            last_activation_time: 0,
            last_ready_time: 0,
            last_start_time: 0,
            last_completion_time: 0,
        }
    }

    pub fn response_avg(&self) -> u64 {
        avg(self.response_total, self.completions)
    }

    pub fn response_jitter(&self) -> u64 {
        self.response_max.saturating_sub(self.response_min)
    }

    pub fn waiting_avg(&self) -> u64 {
        avg(self.waiting_total, self.context_switches)
    }

    pub fn waiting_jitter(&self) -> u64 {
        self.waiting_max.saturating_sub(self.waiting_min)
    }

    pub fn execution_avg(&self) -> u64 {
        avg(self.execution_total, self.context_switches)
    }

    pub fn execution_jitter(&self) -> u64 {
        self.execution_max.saturating_sub(self.execution_min)
    }

    pub fn miss_ratio(&self) -> f64 {
        if self.activations == 0 {
            0.0
        } else {
            self.deadline_misses as f64 / self.activations as f64
        }
    }

    #[cfg(feature = "rt-stats-squared")]
    pub fn response_variance(&self) -> f64 {
        variance(self.response_sum_sq, self.response_total, self.completions)
    }

    #[cfg(feature = "rt-stats-squared")]
    pub fn response_stddev(&self) -> f64 {
        sqrt_f64(self.response_variance())
    }

    #[cfg(feature = "rt-stats-squared")]
    pub fn waiting_variance(&self) -> f64 {
        variance(self.waiting_sum_sq, self.waiting_total, self.context_switches)
    }

    #[cfg(feature = "rt-stats-squared")]
    pub fn waiting_stddev(&self) -> f64 {
        sqrt_f64(self.waiting_variance())
    }

    #[cfg(feature = "rt-stats-squared")]
    pub fn execution_variance(&self) -> f64 {
        variance(self.execution_sum_sq, self.execution_total, self.context_switches)
    }

    #[cfg(feature = "rt-stats-squared")]
    pub fn execution_stddev(&self) -> f64 {
        sqrt_f64(self.execution_variance())
    }

    #[cfg(feature = "rt-stats-detailed")]
    pub fn last_activation_time(&self) -> i64 {
        self.last_activation_time
    }

    #[cfg(feature = "rt-stats-detailed")]
    pub fn last_ready_time(&self) -> i64 {
        self.last_ready_time
    }

    #[cfg(feature = "rt-stats-detailed")]
    pub fn last_start_time(&self) -> i64 {
        self.last_start_time
    }

    #[cfg(feature = "rt-stats-detailed")]
    pub fn last_completion_time(&self) -> i64 {
        self.last_completion_time
    }
}

fn avg(total: u64, n: u64) -> u64 {
    if n == 0 {
        0
    } else {
        total / n
    }
}

#[cfg(feature = "rt-stats-squared")]
fn variance(sum_sq: u64, total: u64, n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let mean = total as f64 / n;
    (sum_sq as f64 / n) - (mean * mean)
}

/// Newton-Raphson square root so `stddev` doesn't need libm in a no_std
/// build. Eight iterations is comfortably enough precision for a
/// statistics report.
#[cfg(feature = "rt-stats-squared")]
fn sqrt_f64(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut guess = x;
    for _ in 0..8 {
        guess = 0.5 * (guess + x / guess);
    }
    guess
}

fn update_aggregate(min: &mut u64, max: &mut u64, total: &mut u64, sample: u64, first: bool) {
    *total = total.saturating_add(sample);
    if first {
        *min = sample;
        *max = sample;
    } else {
        if sample < *min {
            *min = sample;
        }
        if sample > *max {
            *max = sample;
        }
    }
}

/// Application marks the start of a new job.
pub fn on_activation(thread: &mut Thread, now: i64) {
    #[cfg(feature = "rt-stats")]
    {
        thread.rt_stats.activations = thread.rt_stats.activations.saturating_add(1);
        thread.rt_stats.last_activation_time = now;
        log::trace!("rt_stats: activation thread={}", thread.id);
    }
    #[cfg(not(feature = "rt-stats"))]
    {
        let _ = (thread, now);
    }
}

/// Thread becomes ready (after blocking or activation).
pub fn on_ready(thread: &mut Thread, now: i64) {
    #[cfg(feature = "rt-stats")]
    {
        thread.rt_stats.last_ready_time = now;
    }
    #[cfg(not(feature = "rt-stats"))]
    {
        let _ = (thread, now);
    }
}

/// Scheduler dispatches `thread` onto the CPU.
pub fn on_context_switch_in(thread: &mut Thread, now: i64) {
    #[cfg(feature = "rt-stats")]
    {
        let n_before = thread.rt_stats.context_switches;
        let waiting = (now - thread.rt_stats.last_ready_time).max(0) as u64;

        update_aggregate(
            &mut thread.rt_stats.waiting_min,
            &mut thread.rt_stats.waiting_max,
            &mut thread.rt_stats.waiting_total,
            waiting,
            n_before == 0,
        );
        #[cfg(feature = "rt-stats-squared")]
        {
            thread.rt_stats.waiting_sum_sq =
                thread.rt_stats.waiting_sum_sq.saturating_add(waiting.saturating_mul(waiting));
        }

        thread.rt_stats.context_switches = n_before.saturating_add(1);
        thread.rt_stats.last_start_time = now;
        log::trace!("rt_stats: context_switch_in thread={} waiting={}", thread.id, waiting);
    }
    #[cfg(not(feature = "rt-stats"))]
    {
        let _ = (thread, now);
    }
}

/// A still-ready thread was passed over in favor of a different one.
pub fn on_preempted(thread: &mut Thread) {
    #[cfg(feature = "rt-stats")]
    {
        thread.rt_stats.preemptions = thread.rt_stats.preemptions.saturating_add(1);
    }
    #[cfg(not(feature = "rt-stats"))]
    {
        let _ = thread;
    }
}

/// Scheduler descheds `thread`, either because its job completed or
/// because it was preempted/yielded back to ready.
pub fn on_context_switch_out(thread: &mut Thread, completed: bool, now: i64) {
    #[cfg(feature = "rt-stats")]
    {
        let execution = (now - thread.rt_stats.last_start_time).max(0) as u64;
        let first_exec = thread.rt_stats.context_switches == 1;

        update_aggregate(
            &mut thread.rt_stats.execution_min,
            &mut thread.rt_stats.execution_max,
            &mut thread.rt_stats.execution_total,
            execution,
            first_exec,
        );
        #[cfg(feature = "rt-stats-squared")]
        {
            thread.rt_stats.execution_sum_sq = thread
                .rt_stats
                .execution_sum_sq
                .saturating_add(execution.saturating_mul(execution));
        }

        if completed {
            let response = (now - thread.rt_stats.last_activation_time).max(0) as u64;
            let first_resp = thread.rt_stats.completions == 0;

            update_aggregate(
                &mut thread.rt_stats.response_min,
                &mut thread.rt_stats.response_max,
                &mut thread.rt_stats.response_total,
                response,
                first_resp,
            );
            #[cfg(feature = "rt-stats-squared")]
            {
                thread.rt_stats.response_sum_sq = thread
                    .rt_stats
                    .response_sum_sq
                    .saturating_add(response.saturating_mul(response));
            }

            thread.rt_stats.completions = thread.rt_stats.completions.saturating_add(1);
            thread.rt_stats.last_completion_time = now;
        }
        log::trace!(
            "rt_stats: context_switch_out thread={} completed={} execution={}",
            thread.id,
            completed,
            execution
        );
    }
    #[cfg(not(feature = "rt-stats"))]
    {
        let _ = (thread, completed, now);
    }
}

/// Application reports a missed deadline for `thread`.
pub fn on_deadline_miss(thread: &mut Thread) {
    #[cfg(feature = "rt-stats")]
    {
        thread.rt_stats.deadline_misses = thread.rt_stats.deadline_misses.saturating_add(1);
        log::debug!("rt_stats: deadline miss thread={}", thread.id);
    }
    #[cfg(not(feature = "rt-stats"))]
    {
        let _ = thread;
    }
}

/// Marks a priority inversion for `thread`. No internal code path raises
/// this automatically (the engine has no notion of lock ownership); it is
/// exposed for a host kernel or application lock implementation to call
/// when it detects one.
pub fn mark_priority_inversion(thread: &mut Thread) {
    #[cfg(feature = "rt-stats")]
    {
        thread.rt_stats.priority_inversions = thread.rt_stats.priority_inversions.saturating_add(1);
    }
    #[cfg(not(feature = "rt-stats"))]
    {
        let _ = thread;
    }
}

pub fn stats_get(scheduler: &Scheduler, thread_id: ThreadId) -> RtStats {
    scheduler
        .get_thread(thread_id)
        .map(|t| t.rt_stats)
        .unwrap_or_default()
}

pub fn stats_reset(scheduler: &mut Scheduler, thread_id: ThreadId) -> ThreadResult<()> {
    let thread = scheduler
        .get_thread_mut(thread_id)
        .ok_or(crate::error::ThreadError::InvalidThreadId)?;
    thread.rt_stats = RtStats::new();
    Ok(())
}
