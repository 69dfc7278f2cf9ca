#![no_std]

pub mod context;
pub mod error;
pub mod preemption;
pub mod rt;
pub mod safe_api;
pub mod scheduler;
pub mod sync;
pub mod thread;
pub mod time;

#[cfg(test)]
extern crate std;

#[cfg(all(not(test), not(feature = "std")))]
use core::panic::PanicInfo;

#[cfg(all(not(test), not(feature = "std")))]
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}

pub use error::{ThreadError, ThreadResult};
pub use rt::{api as rt_api, csv as rt_csv, params::RtParams, policy as rt_policy, stats::RtStats};
pub use safe_api::{
    exit_thread as safe_exit, yield_now, Mutex, MutexGuard, ThreadBuilder, ThreadHandle, ThreadPool,
};
pub use scheduler::{Scheduler, SchedulerCell, SCHEDULER};
pub use sync::{exit_thread, yield_thread};
pub use thread::{Thread, ThreadId, ThreadState};
