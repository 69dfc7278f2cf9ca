//! Monotonic cycle-time source consumed by the RT extension.
//!
//! The policy engine and statistics hooks only need a cheap, strictly
//! monotonic cycle count (spec: "a monotonic cycle counter" exposed by the
//! host kernel). On `x86_64` we read the TSC directly, the same register
//! the teacher crate's APIC timer calibration used; every other target
//! falls back to a portable software clock advanced by the host kernel's
//! own timer-tick handler.

#[cfg(feature = "x86_64")]
fn read_tsc() -> i64 {
    let low: u32;
    let high: u32;
    unsafe {
        core::arch::asm!(
            "rdtsc",
            out("eax") low,
            out("edx") high,
            options(nomem, nostack, preserves_flags)
        );
    }
    (((high as u64) << 32) | (low as u64)) as i64
}

#[cfg(not(feature = "x86_64"))]
static FALLBACK_CLOCK: portable_atomic::AtomicI64 = portable_atomic::AtomicI64::new(0);

/// Returns the current cycle count used as "now" by every RT operation in
/// `rt::params`, `rt::policy`, and `rt::stats`. Reading it never advances
/// it — on the fallback path only `advance_fallback_clock` does, so a
/// burst of instrumentation calls at the same instant all observe the
/// same `now`.
pub fn now_cycles() -> i64 {
    #[cfg(feature = "x86_64")]
    {
        read_tsc()
    }
    #[cfg(not(feature = "x86_64"))]
    {
        FALLBACK_CLOCK.load(portable_atomic::Ordering::Relaxed)
    }
}

/// Advances the portable fallback clock by `cycles`. Intended to be called
/// from the host kernel's timer-tick handler on targets without a
/// free-running cycle counter; a no-op on `x86_64` where the TSC is read
/// directly.
#[cfg(not(feature = "x86_64"))]
pub fn advance_fallback_clock(cycles: i64) {
    FALLBACK_CLOCK.fetch_add(cycles, portable_atomic::Ordering::Relaxed);
}
