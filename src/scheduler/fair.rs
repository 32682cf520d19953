//! Virtual-runtime fair scheduler.
//!
//! # Algorithm
//!
//! Each scheduling round:
//! 1. If the queue is empty, nothing is selected.
//! 2. The running process (if any) is demoted and requeued at its current
//!    virtual runtime.
//! 3. The minimum-vruntime process is extracted and becomes the runner.
//!
//! [`tick`](FairScheduler::tick) charges the runner one time slice. The
//! process that just ran competes again at its new vruntime, so CPU time
//! spreads across processes in order of least accumulated runtime.
//!
//! # Reference
//! Love (2010), "Linux Kernel Development", Ch. 4 (The Completely Fair Scheduler)

use std::num::NonZeroU64;

use log::{debug, trace};

use super::{SchedulerConfig, SchedulerError, SchedulerResult};
use crate::heap::MinHeap;
use crate::models::{ByVruntime, Pid, Process};
use crate::validation::validate_against;

/// Fair-share scheduler over a vruntime-ordered min-heap.
///
/// Owns every submitted process. At most one process is running; all other
/// processes are queued.
///
/// # Example
///
/// ```
/// use u_fairshare::models::Process;
/// use u_fairshare::scheduler::FairScheduler;
///
/// let mut scheduler = FairScheduler::new(4).unwrap();
/// scheduler.schedule_process(Process::new(1, 0).with_vruntime(3)).unwrap();
/// scheduler.schedule_process(Process::new(2, 0)).unwrap();
///
/// let next = scheduler.get_next_process().unwrap().unwrap();
/// assert_eq!(next.pid, 2);
/// assert!(next.is_running);
///
/// scheduler.tick();
/// assert_eq!(scheduler.current().unwrap().vruntime, 1);
/// ```
#[derive(Debug, Clone)]
pub struct FairScheduler {
    process_queue: MinHeap<Process, ByVruntime>,
    current_process: Option<Process>,
    time_slice: NonZeroU64,
}

impl FairScheduler {
    /// Creates a scheduler with the given queue capacity and a time slice of 1.
    ///
    /// # Errors
    /// [`SchedulerError::Heap`] if the queue cannot be allocated.
    pub fn new(capacity: usize) -> SchedulerResult<Self> {
        Self::with_config(SchedulerConfig::new().with_capacity(capacity))
    }

    /// Creates a scheduler from a configuration.
    pub fn with_config(config: SchedulerConfig) -> SchedulerResult<Self> {
        let process_queue = MinHeap::with_capacity(config.capacity, ByVruntime)?;
        Ok(Self {
            process_queue,
            current_process: None,
            time_slice: config.time_slice,
        })
    }

    /// Queues a copy of `process`.
    ///
    /// The process is inserted as given; its `is_running` flag is not touched.
    /// Pids are not checked here; use [`schedule_all`](Self::schedule_all) for
    /// validated submission.
    pub fn schedule_process(&mut self, process: Process) -> SchedulerResult<()> {
        trace!(
            "queue pid {} (nice {}, vruntime {})",
            process.pid,
            process.nice,
            process.vruntime
        );
        self.process_queue.insert(process)?;
        Ok(())
    }

    /// Validates and queues a batch of processes.
    ///
    /// Nothing is queued if any process has a duplicate pid (within the batch
    /// or against processes already owned) or a nice value out of range.
    ///
    /// # Errors
    /// - [`SchedulerError::Validation`] with every issue found.
    /// - [`SchedulerError::Heap`] if the queue cannot grow. Processes queued
    ///   before the failure remain queued.
    pub fn schedule_all(&mut self, processes: &[Process]) -> SchedulerResult<()> {
        validate_against(processes, self.pids()).map_err(SchedulerError::Validation)?;
        for &process in processes {
            self.schedule_process(process)?;
        }
        Ok(())
    }

    /// Runs one scheduling round and returns the newly running process.
    ///
    /// Returns `Ok(None)` when the queue is empty. In that case no state
    /// changes: a process that is already running keeps its slot and is
    /// still reported by [`current`](Self::current).
    ///
    /// # Errors
    /// [`SchedulerError::Heap`] if requeueing the previous runner needs to
    /// grow the queue and growth fails. The previous runner stays current.
    pub fn get_next_process(&mut self) -> SchedulerResult<Option<&Process>> {
        if self.process_queue.is_empty() {
            return Ok(None);
        }

        if let Some(mut prev) = self.current_process.take() {
            if prev.is_running {
                prev.is_running = false;
                if let Err(e) = self.process_queue.insert(prev) {
                    prev.is_running = true;
                    self.current_process = Some(prev);
                    return Err(e.into());
                }
                debug!("requeue pid {} at vruntime {}", prev.pid, prev.vruntime);
            }
        }

        let Some(mut next) = self.process_queue.extract_min() else {
            return Ok(None);
        };
        next.is_running = true;
        debug!("run pid {} at vruntime {}", next.pid, next.vruntime);
        self.current_process = Some(next);
        Ok(self.current_process.as_ref())
    }

    /// Charges the running process one time slice.
    ///
    /// No effect when nothing is running. `nice` is not consulted.
    pub fn tick(&mut self) {
        if let Some(process) = self.current_process.as_mut() {
            process.advance(self.time_slice.get());
            trace!("tick pid {} -> vruntime {}", process.pid, process.vruntime);
        }
    }

    /// The running process, if any.
    pub fn current(&self) -> Option<&Process> {
        self.current_process.as_ref()
    }

    /// The queued process that would be selected next, if any.
    pub fn peek_next(&self) -> Option<&Process> {
        self.process_queue.peek()
    }

    /// Queued processes in queue storage order (not sorted).
    pub fn queued(&self) -> impl Iterator<Item = &Process> {
        self.process_queue.iter()
    }

    /// Number of queued processes.
    pub fn queued_len(&self) -> usize {
        self.process_queue.len()
    }

    /// Queued plus running processes.
    pub fn process_count(&self) -> usize {
        self.process_queue.len() + usize::from(self.current_process.is_some())
    }

    /// Whether no process is queued or running.
    pub fn is_idle(&self) -> bool {
        self.process_count() == 0
    }

    /// Vruntime added per tick.
    pub fn time_slice(&self) -> u64 {
        self.time_slice.get()
    }

    /// Pids of every owned process, running first.
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.current_process
            .iter()
            .chain(self.process_queue.iter())
            .map(|p| p.pid)
    }

    /// Tears the scheduler down, returning every owned process.
    ///
    /// The running process (if any) comes first, followed by the queue in
    /// storage order.
    pub fn shutdown(self) -> Vec<Process> {
        let mut processes = Vec::with_capacity(self.process_count());
        processes.extend(self.current_process);
        processes.extend(self.process_queue.into_vec());
        debug!("scheduler shut down with {} processes", processes.len());
        processes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapError;
    use crate::validation::ValidationErrorKind;

    fn scheduler_with(processes: &[(Pid, u64)]) -> FairScheduler {
        let mut s = FairScheduler::new(processes.len()).unwrap();
        for &(pid, vruntime) in processes {
            s.schedule_process(Process::new(pid, 0).with_vruntime(vruntime))
                .unwrap();
        }
        s
    }

    fn next_pid(s: &mut FairScheduler) -> Option<Pid> {
        s.get_next_process().unwrap().map(|p| p.pid)
    }

    #[test]
    fn test_new_scheduler() {
        let s = FairScheduler::new(10).unwrap();
        assert!(s.current().is_none());
        assert_eq!(s.queued_len(), 0);
        assert_eq!(s.time_slice(), 1);
        assert!(s.is_idle());
    }

    #[test]
    fn test_zero_capacity_scheduler_grows() {
        let mut s = scheduler_with(&[]);
        for pid in 1..=5 {
            s.schedule_process(Process::new(pid, 0)).unwrap();
        }
        assert_eq!(s.queued_len(), 5);
    }

    #[test]
    fn test_empty_queue_is_idempotent() {
        let mut s = FairScheduler::new(4).unwrap();
        for _ in 0..3 {
            assert!(s.get_next_process().unwrap().is_none());
            assert!(s.current().is_none());
            assert_eq!(s.process_count(), 0);
        }
        s.tick();
        assert!(s.current().is_none());
    }

    #[test]
    fn test_selects_minimum_vruntime() {
        let mut s = scheduler_with(&[(1, 9), (2, 4), (3, 7)]);
        let p = *s.get_next_process().unwrap().unwrap();
        assert_eq!(p.pid, 2);
        assert_eq!(p.vruntime, 4);
        assert!(p.is_running);
        assert_eq!(s.queued_len(), 2);
        assert!(s.queued().all(|q| !q.is_running));
    }

    #[test]
    fn test_reference_scenario() {
        // P1(0), P2(5), P3(2) submitted in that order
        let mut s = scheduler_with(&[(1, 0), (2, 5), (3, 2)]);

        assert_eq!(next_pid(&mut s), Some(1));
        s.tick();
        assert_eq!(s.current().unwrap().vruntime, 1);

        // P1 requeued at 1, still the minimum of {1, 5, 2}
        assert_eq!(next_pid(&mut s), Some(1));
        s.tick();
        assert_eq!(s.current().unwrap().vruntime, 2);

        // P1 requeued at 2 ties with P3 at 2. P1 lands as a leaf under P3
        // and is not strictly smaller, so P3 stays at the root.
        assert_eq!(next_pid(&mut s), Some(3));
        let queued: Vec<_> = s.queued().map(|p| (p.pid, p.vruntime)).collect();
        assert_eq!(queued, vec![(1, 2), (2, 5)]);
    }

    #[test]
    fn test_requeue_keeps_process_count() {
        let mut s = scheduler_with(&[(1, 3), (2, 1), (3, 4), (4, 1)]);
        for _ in 0..25 {
            assert!(s.get_next_process().unwrap().is_some());
            assert_eq!(s.process_count(), 4);
            s.tick();
        }
        let mut pids: Vec<_> = s.pids().collect();
        pids.sort();
        assert_eq!(pids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_running_process() {
        let mut s = scheduler_with(&[(1, 0), (2, 0), (3, 0)]);
        for _ in 0..10 {
            s.get_next_process().unwrap();
            s.tick();
            let running = s
                .current()
                .into_iter()
                .chain(s.queued())
                .filter(|p| p.is_running);
            assert_eq!(running.count(), 1);
        }
    }

    #[test]
    fn test_vruntime_monotonic() {
        let mut s = scheduler_with(&[(1, 0), (2, 3), (3, 1)]);
        let mut last = std::collections::HashMap::new();
        for _ in 0..30 {
            let (pid, before) = {
                let p = s.get_next_process().unwrap().unwrap();
                (p.pid, p.vruntime)
            };
            if let Some(&prev) = last.get(&pid) {
                assert!(before >= prev);
            }
            s.tick();
            let after = s.current().unwrap().vruntime;
            assert_eq!(after, before + s.time_slice());
            last.insert(pid, after);
        }
    }

    #[test]
    fn test_custom_time_slice() {
        let config = SchedulerConfig::new().with_time_slice(NonZeroU64::new(5).unwrap());
        let mut s = FairScheduler::with_config(config).unwrap();
        s.schedule_process(Process::new(1, 0)).unwrap();
        s.get_next_process().unwrap();
        s.tick();
        s.tick();
        assert_eq!(s.current().unwrap().vruntime, 10);
    }

    #[test]
    fn test_tick_ignores_nice() {
        let mut s = FairScheduler::new(2).unwrap();
        s.schedule_process(Process::new(1, -20)).unwrap();
        s.get_next_process().unwrap();
        s.tick();
        assert_eq!(s.current().unwrap().vruntime, 1);

        let mut s = FairScheduler::new(2).unwrap();
        s.schedule_process(Process::new(1, 19)).unwrap();
        s.get_next_process().unwrap();
        s.tick();
        assert_eq!(s.current().unwrap().vruntime, 1);
    }

    #[test]
    fn test_tick_without_runner_is_noop() {
        let mut s = scheduler_with(&[(1, 0)]);
        s.tick();
        assert_eq!(s.peek_next().unwrap().vruntime, 0);
    }

    #[test]
    fn test_sole_process_keeps_running_when_queue_empty() {
        let mut s = scheduler_with(&[(1, 0)]);
        assert_eq!(next_pid(&mut s), Some(1));
        s.tick();

        // Nothing queued: no new selection, runner untouched
        assert_eq!(next_pid(&mut s), None);
        let current = s.current().unwrap();
        assert_eq!(current.pid, 1);
        assert!(current.is_running);
        assert_eq!(s.process_count(), 1);

        // A newcomer at lower vruntime takes over on the next round
        s.schedule_process(Process::new(2, 0)).unwrap();
        assert_eq!(next_pid(&mut s), Some(2));
        assert_eq!(s.peek_next().unwrap().pid, 1);
        assert!(!s.peek_next().unwrap().is_running);
    }

    #[test]
    fn test_failed_requeue_keeps_runner() {
        let mut s = scheduler_with(&[(1, 0), (2, 4)]);
        assert_eq!(next_pid(&mut s), Some(1));
        s.tick();
        s.schedule_process(Process::new(3, 0).with_vruntime(9)).unwrap();
        // Queue is full at capacity 2; requeueing pid 1 must grow
        assert_eq!(s.queued_len(), 2);
        s.process_queue.set_growth_ceiling(Some(2));

        let err = s.get_next_process().unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::Heap(HeapError::AllocationFailure(_))
        ));
        let current = s.current().unwrap();
        assert_eq!(current.pid, 1);
        assert_eq!(current.vruntime, 1);
        assert!(current.is_running);
        assert_eq!(s.queued_len(), 2);
        assert_eq!(s.process_count(), 3);

        s.process_queue.set_growth_ceiling(None);
        assert_eq!(next_pid(&mut s), Some(1));
        assert_eq!(s.process_count(), 3);
    }

    #[test]
    fn test_failed_submit_leaves_queue_unchanged() {
        let mut s = scheduler_with(&[(1, 0)]);
        s.process_queue.set_growth_ceiling(Some(1));

        let err = s.schedule_process(Process::new(2, 0)).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::Heap(HeapError::AllocationFailure(_))
        ));
        let pids: Vec<_> = s.pids().collect();
        assert_eq!(pids, vec![1]);
    }

    #[test]
    fn test_schedule_all_validates() {
        let mut s = FairScheduler::new(4).unwrap();
        s.schedule_all(&[Process::new(1, 0), Process::new(2, 5)]).unwrap();

        let err = s
            .schedule_all(&[Process::new(3, 0), Process::new(2, 0), Process::new(4, 99)])
            .unwrap_err();
        match err {
            SchedulerError::Validation(errors) => {
                let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
                assert_eq!(
                    kinds,
                    vec![
                        ValidationErrorKind::DuplicatePid,
                        ValidationErrorKind::NiceOutOfRange
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing from the rejected batch was queued
        assert_eq!(s.queued_len(), 2);
    }

    #[test]
    fn test_schedule_all_sees_running_pid() {
        let mut s = scheduler_with(&[(1, 0)]);
        s.get_next_process().unwrap();
        assert!(s.schedule_all(&[Process::new(1, 0)]).is_err());
    }

    #[test]
    fn test_shutdown_returns_everything() {
        let mut s = scheduler_with(&[(1, 0), (2, 1), (3, 2)]);
        s.get_next_process().unwrap();
        s.tick();

        let processes = s.shutdown();
        assert_eq!(processes.len(), 3);
        assert_eq!(processes[0].pid, 1);
        assert!(processes[0].is_running);
        assert_eq!(processes[0].vruntime, 1);
        assert!(processes[1..].iter().all(|p| !p.is_running));
    }
}
