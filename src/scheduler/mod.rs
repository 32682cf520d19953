//! Fair-share scheduler and simulation driver.
//!
//! `FairScheduler` layers a queued/running state machine on top of a
//! vruntime-ordered [`MinHeap`](crate::heap::MinHeap). `Simulation` drives it
//! round by round (select, then tick) and reports how often each process ran.
//!
//! # Process States
//!
//! | State | Where | `is_running` |
//! |-------|-------|--------------|
//! | Queued | process queue | `false` |
//! | Running | current slot | `true` |
//!
//! # Reference
//! Love (2010), "Linux Kernel Development", Ch. 4 (The Completely Fair Scheduler)

mod config;
mod fair;
mod simulation;

pub use config::{SchedulerConfig, DEFAULT_CAPACITY};
pub use fair::FairScheduler;
pub use simulation::{RoundRecord, Simulation, SimulationReport};

use crate::heap::HeapError;
use crate::validation::ValidationError;
use thiserror::Error;

/// Scheduler errors.
///
/// An idle scheduler is not an error: selection returns `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// The process queue could not be allocated or grown.
    #[error(transparent)]
    Heap(#[from] HeapError),
    /// A submitted batch failed validation.
    #[error("invalid process batch: {} issue(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

/// Scheduler operation result.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
