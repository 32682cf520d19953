//! Process model.
//!
//! A process is the schedulable unit: an identity, a niceness bias, and an
//! accumulated virtual runtime. Lower virtual runtime runs sooner.
//!
//! # Reference
//! Love (2010), "Linux Kernel Development", Ch. 4 (The Completely Fair Scheduler)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::heap::Comparator;

/// Process identifier, assigned by the caller.
pub type Pid = u32;

/// Lowest accepted nice value (highest priority).
pub const NICE_MIN: i32 = -20;

/// Highest accepted nice value (lowest priority).
pub const NICE_MAX: i32 = 19;

/// A schedulable process.
///
/// Values handed to the scheduler are copied into scheduler-owned storage.
/// Snapshots returned by the scheduler are read-only views of that storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique process identifier.
    pub pid: Pid,
    /// Priority bias. Stored and reported; does not weight vruntime growth.
    pub nice: i32,
    /// Accumulated virtual execution time.
    pub vruntime: u64,
    /// True only while this process is the scheduler's current selection.
    pub is_running: bool,
}

impl Process {
    /// Creates a queued process with zero virtual runtime.
    pub fn new(pid: Pid, nice: i32) -> Self {
        Self {
            pid,
            nice,
            vruntime: 0,
            is_running: false,
        }
    }

    /// Sets the initial virtual runtime.
    pub fn with_vruntime(mut self, vruntime: u64) -> Self {
        self.vruntime = vruntime;
        self
    }

    /// Adds `delta` to the virtual runtime, saturating at `u64::MAX`.
    #[inline]
    pub fn advance(&mut self, delta: u64) {
        self.vruntime = self.vruntime.saturating_add(delta);
    }

    /// Whether `nice` lies within `NICE_MIN..=NICE_MAX`.
    pub fn has_valid_nice(&self) -> bool {
        (NICE_MIN..=NICE_MAX).contains(&self.nice)
    }
}

/// Orders processes by ascending virtual runtime.
///
/// Equal vruntimes compare equal; there is no pid tiebreak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByVruntime;

impl Comparator<Process> for ByVruntime {
    #[inline]
    fn compare(&self, a: &Process, b: &Process) -> Ordering {
        a.vruntime.cmp(&b.vruntime)
    }
}
