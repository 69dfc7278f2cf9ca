use crate::scheduler::SCHEDULER;

pub fn yield_thread() {
    unsafe {
        let scheduler = SCHEDULER.get();

        if let Some(current_id) = scheduler.get_current_thread() {
            if let Some(next_id) = scheduler.schedule() {
                if current_id != next_id {
                    scheduler.set_current_thread(Some(next_id));
                    let _ = scheduler.switch_context(current_id, next_id);
                }
            }
        }
    }
}

pub fn exit_thread() -> ! {
    unsafe {
        let scheduler = SCHEDULER.get();
        
        if let Some(current_id) = scheduler.get_current_thread() {
            scheduler.exit_current_thread();

            if let Some(next_id) = scheduler.schedule() {
                scheduler.set_current_thread(Some(next_id));
                let _ = scheduler.switch_context(current_id, next_id);
            }
        }
    }

    loop {
        #[cfg(target_arch = "x86_64")]
        unsafe { core::arch::asm!("hlt") }
        
        #[cfg(not(target_arch = "x86_64"))]
        core::hint::spin_loop();
    }
}

pub fn sleep_ms(_ms: u64) {
    yield_thread();
}

/// Ends the calling thread's current job and cooperatively suspends it
/// until `wake_at` (an absolute cycle count), then dispatches whatever
/// thread the policy engine picks next. This is the sleep-until-absolute-
/// time primitive a periodic task calls at the end of every iteration.
pub fn sleep_until(wake_at: i64) {
    unsafe {
        let scheduler = SCHEDULER.get();

        if let Some(current_id) = scheduler.get_current_thread() {
            let _ = scheduler.sleep_current_thread_until(current_id, wake_at);

            if let Some(next_id) = scheduler.schedule() {
                scheduler.set_current_thread(Some(next_id));
                if current_id != next_id {
                    let _ = scheduler.switch_context(current_id, next_id);
                }
            }
        }
    }
}
