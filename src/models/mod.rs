//! Scheduling domain models.
//!
//! # Domain Mappings
//!
//! | u-fairshare | Operating System | Batch Cluster |
//! |-------------|------------------|---------------|
//! | Process | Thread/Task | Job |
//! | vruntime | Weighted CPU time | Consumed share |
//! | nice | Niceness | Queue priority |

mod process;

pub use process::{ByVruntime, Pid, Process, NICE_MAX, NICE_MIN};
