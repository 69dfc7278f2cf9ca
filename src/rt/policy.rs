//! The pluggable scheduler policy engine.
//!
//! Exactly one `policy-*` feature is selected at build time, so `cmp` is a
//! single direct function rather than a `dyn` trait object — build-time
//! mutual exclusion makes indirect dispatch unnecessary. Dynamic-key
//! policies (WSRT, LLF, PFS) recompute their key fresh on every call
//! instead of caching a sort order, so `Scheduler::schedule` can use one
//! O(N) linear scan for all six policies uniformly.

use core::cmp::Ordering;

use crate::thread::Thread;

#[cfg(not(any(
    feature = "policy-deadline",
    feature = "policy-edf",
    feature = "policy-rms",
    feature = "policy-wsrt",
    feature = "policy-llf",
    feature = "policy-pfs",
)))]
compile_error!(
    "exactly one rt scheduling policy feature must be enabled: \
     policy-deadline, policy-edf, policy-rms, policy-wsrt, policy-llf, or policy-pfs"
);

#[cfg(any(
    all(feature = "policy-deadline", feature = "policy-edf"),
    all(feature = "policy-deadline", feature = "policy-rms"),
    all(feature = "policy-deadline", feature = "policy-wsrt"),
    all(feature = "policy-deadline", feature = "policy-llf"),
    all(feature = "policy-deadline", feature = "policy-pfs"),
    all(feature = "policy-edf", feature = "policy-rms"),
    all(feature = "policy-edf", feature = "policy-wsrt"),
    all(feature = "policy-edf", feature = "policy-llf"),
    all(feature = "policy-edf", feature = "policy-pfs"),
    all(feature = "policy-rms", feature = "policy-wsrt"),
    all(feature = "policy-rms", feature = "policy-llf"),
    all(feature = "policy-rms", feature = "policy-pfs"),
    all(feature = "policy-wsrt", feature = "policy-llf"),
    all(feature = "policy-wsrt", feature = "policy-pfs"),
    all(feature = "policy-llf", feature = "policy-pfs"),
))]
compile_error!("at most one rt scheduling policy feature may be enabled at a time");

#[cfg(all(feature = "policy-wsrt", not(feature = "runtime-usage-tracking")))]
compile_error!("policy-wsrt requires the `runtime-usage-tracking` feature (time_left must decrease as the thread runs)");

#[cfg(all(feature = "policy-llf", not(feature = "runtime-usage-tracking")))]
compile_error!("policy-llf requires the `runtime-usage-tracking` feature (time_left must decrease as the thread runs)");

/// Strict weak ordering over ready threads: `Ordering::Less` means `a`
/// should run before `b`. The host scheduler picks the minimum under this
/// order; ties fall through to run-queue (FIFO/insertion) order since the
/// comparator is only ever used to find the *first* minimal element in a
/// forward scan.
#[cfg(feature = "policy-deadline")]
pub fn cmp(a: &Thread, b: &Thread) -> Ordering {
    a.rt.deadline.cmp(&b.rt.deadline)
}

#[cfg(feature = "policy-edf")]
pub fn cmp(a: &Thread, b: &Thread) -> Ordering {
    let key_a = a.rt.deadline / a.rt.effective_weight();
    let key_b = b.rt.deadline / b.rt.effective_weight();
    key_a.cmp(&key_b).then_with(|| a.rt.deadline.cmp(&b.rt.deadline))
}

#[cfg(feature = "policy-rms")]
pub fn cmp(a: &Thread, b: &Thread) -> Ordering {
    a.rt
        .exec_time
        .cmp(&b.rt.exec_time)
        .then_with(|| a.rt.deadline.cmp(&b.rt.deadline))
}

#[cfg(feature = "policy-wsrt")]
pub fn cmp(a: &Thread, b: &Thread) -> Ordering {
    let key_a = a.rt.time_left / a.rt.effective_weight();
    let key_b = b.rt.time_left / b.rt.effective_weight();
    key_a.cmp(&key_b).then_with(|| a.rt.deadline.cmp(&b.rt.deadline))
}

#[cfg(feature = "policy-llf")]
pub fn cmp(a: &Thread, b: &Thread) -> Ordering {
    let laxity_a = a.rt.deadline - a.rt.time_left;
    let laxity_b = b.rt.deadline - b.rt.time_left;
    laxity_a.cmp(&laxity_b).then_with(|| a.rt.deadline.cmp(&b.rt.deadline))
}

#[cfg(feature = "policy-pfs")]
pub fn cmp(a: &Thread, b: &Thread) -> Ordering {
    let key_a = a.rt.accumulated_runtime / a.rt.effective_weight();
    let key_b = b.rt.accumulated_runtime / b.rt.effective_weight();
    key_a.cmp(&key_b).then_with(|| a.rt.deadline.cmp(&b.rt.deadline))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread_with_rt(id: usize, deadline: i64, weight: i64, exec_time: i64, time_left: i64, accumulated: i64) -> Thread {
        static mut STACK: [u8; 4096] = [0u8; 4096];
        let stack: &'static mut [u8] = unsafe { &mut *core::ptr::addr_of_mut!(STACK) };
        let mut t = Thread::new(id, stack, || {}, 5);
        t.rt.deadline = deadline;
        t.rt.weight = weight;
        t.rt.exec_time = exec_time;
        t.rt.time_left = time_left;
        t.rt.accumulated_runtime = accumulated;
        t
    }

    #[test]
    fn cmp_is_a_strict_weak_ordering_reflexive() {
        let t = thread_with_rt(0, 100, 2, 10, 10, 0);
        assert_eq!(cmp(&t, &t), Ordering::Equal);
    }

    #[test]
    fn cmp_is_antisymmetric() {
        let a = thread_with_rt(0, 50, 2, 10, 10, 5);
        let b = thread_with_rt(1, 100, 3, 20, 20, 9);
        assert_eq!(cmp(&a, &b), cmp(&b, &a).reverse());
    }

    #[test]
    #[cfg(feature = "policy-pfs")]
    fn weight_ratio_drives_proportional_service() {
        use crate::rt::params;

        // Three tasks, weights 1:2:4, sharing the CPU under PFS. Every
        // round the comparator's pick is handed one fixed quantum; over
        // many rounds each task's accumulated service should approach its
        // share of the weight sum (spec scenario 3: weight ratio 1:2:4).
        const QUANTUM: i64 = 1;
        const ROUNDS: i64 = 1400;

        let mut a = thread_with_rt(0, 1_000_000, 1, 0, 0, 0);
        let mut b = thread_with_rt(1, 1_000_000, 2, 0, 0, 0);
        let mut c = thread_with_rt(2, 1_000_000, 4, 0, 0, 0);

        let mut now = 0i64;
        for _ in 0..ROUNDS {
            let winner = if cmp(&a, &b) != Ordering::Greater && cmp(&a, &c) != Ordering::Greater {
                &mut a
            } else if cmp(&b, &c) != Ordering::Greater {
                &mut b
            } else {
                &mut c
            };
            params::mark_dispatched(&mut winner.rt, now);
            now += QUANTUM;
            params::accrue(&mut winner.rt, now);
        }

        let ra = a.rt.accumulated_runtime;
        let rb = b.rt.accumulated_runtime;
        let rc = c.rt.accumulated_runtime;
        assert!(ra > 0 && rb > 0 && rc > 0);

        // Directional fairness: strictly more weight means strictly more
        // accumulated service.
        assert!(rb > ra);
        assert!(rc > rb);

        // Ratio roughly tracks the weight ratio; generous tolerance since
        // this asserts on a hand-simulated discrete scheduler, not the
        // exact limiting distribution.
        let ratio_ba = rb as f64 / ra as f64;
        let ratio_ca = rc as f64 / ra as f64;
        assert!((ratio_ba - 2.0).abs() < 0.5, "b/a ratio {ratio_ba} not close to 2.0");
        assert!((ratio_ca - 4.0).abs() < 1.0, "c/a ratio {ratio_ca} not close to 4.0");
    }
}
