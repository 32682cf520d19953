//! Fair-share process scheduling for the U-Engine ecosystem.
//!
//! Processes accumulate virtual runtime while they run; the process with the
//! least virtual runtime runs next. Ordering is delegated to a generic binary
//! min-heap, and the scheduler adds the queued/running lifecycle on top.
//!
//! # Modules
//!
//! - **`heap`**: `MinHeap<T, C>`, an array-backed binary heap keyed by a
//!   `Comparator`, with explicit doubling growth and copy-in merge
//! - **`models`**: `Process` and the `ByVruntime` ordering
//! - **`scheduler`**: `FairScheduler` (select, requeue, tick), `SchedulerConfig`,
//!   and the round-based `Simulation` driver
//! - **`validation`**: Batch checks (duplicate pids, nice range)
//!
//! # Example
//!
//! ```
//! use u_fairshare::models::Process;
//! use u_fairshare::scheduler::FairScheduler;
//!
//! let mut scheduler = FairScheduler::new(8).unwrap();
//! scheduler.schedule_process(Process::new(1, 0)).unwrap();
//! scheduler.schedule_process(Process::new(2, 0).with_vruntime(5)).unwrap();
//!
//! while let Some(p) = scheduler.get_next_process().unwrap() {
//!     if p.vruntime >= 5 {
//!         break;
//!     }
//!     scheduler.tick();
//! }
//! assert_eq!(scheduler.current().unwrap().vruntime, 5);
//! ```
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 6
//! - Love (2010), "Linux Kernel Development", Ch. 4

pub mod heap;
pub mod models;
pub mod scheduler;
pub mod validation;
