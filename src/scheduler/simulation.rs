//! Round-based scheduler simulation.
//!
//! Each round asks the scheduler for the next process and, if one was
//! selected, charges it one tick. Rounds with no selection are recorded as
//! idle and do not tick.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Selections | Rounds in which a pid was chosen to run |
//! | Idle rounds | Rounds with no selection |
//! | Spread | max(selections) - min(selections) across pids that ran |

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{FairScheduler, SchedulerResult};
use crate::models::Pid;

/// What happened in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Zero-based round number.
    pub round: usize,
    /// Selected process. `None` for an idle round.
    pub pid: Option<Pid>,
    /// Vruntime of the selected process at selection time.
    pub vruntime: Option<u64>,
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// One record per round, in order.
    pub rounds: Vec<RoundRecord>,
    /// Selection count per pid.
    pub selections: BTreeMap<Pid, usize>,
}

impl SimulationReport {
    /// Rounds in which nothing was selected.
    pub fn idle_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| r.pid.is_none()).count()
    }

    /// Rounds in which a process was selected.
    pub fn busy_rounds(&self) -> usize {
        self.rounds.len() - self.idle_rounds()
    }

    /// How many rounds `pid` was selected.
    pub fn selection_count(&self, pid: Pid) -> usize {
        self.selections.get(&pid).copied().unwrap_or(0)
    }

    /// Difference between the most and least selected pids.
    ///
    /// Zero when fewer than two pids ran.
    pub fn spread(&self) -> usize {
        let max = self.selections.values().max().copied().unwrap_or(0);
        let min = self.selections.values().min().copied().unwrap_or(0);
        max - min
    }
}

/// Drives a [`FairScheduler`] for a number of rounds.
///
/// # Example
///
/// ```
/// use u_fairshare::models::Process;
/// use u_fairshare::scheduler::{FairScheduler, Simulation};
///
/// let mut scheduler = FairScheduler::new(3).unwrap();
/// for pid in 1..=3 {
///     scheduler.schedule_process(Process::new(pid, 0)).unwrap();
/// }
///
/// let report = Simulation::new(scheduler).run(9).unwrap();
/// assert_eq!(report.selection_count(2), 3);
/// assert_eq!(report.spread(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    scheduler: FairScheduler,
    next_round: usize,
}

impl Simulation {
    /// Wraps a scheduler.
    pub fn new(scheduler: FairScheduler) -> Self {
        Self {
            scheduler,
            next_round: 0,
        }
    }

    /// The driven scheduler.
    pub fn scheduler(&self) -> &FairScheduler {
        &self.scheduler
    }

    /// Mutable access, e.g. to submit processes between runs.
    pub fn scheduler_mut(&mut self) -> &mut FairScheduler {
        &mut self.scheduler
    }

    /// Releases the driven scheduler.
    pub fn into_scheduler(self) -> FairScheduler {
        self.scheduler
    }

    /// Runs `rounds` rounds of select-then-tick.
    ///
    /// Round numbers continue across calls.
    pub fn run(&mut self, rounds: usize) -> SchedulerResult<SimulationReport> {
        let mut report = SimulationReport {
            rounds: Vec::with_capacity(rounds),
            selections: BTreeMap::new(),
        };

        for _ in 0..rounds {
            let round = self.next_round;
            self.next_round += 1;

            let selected = self
                .scheduler
                .get_next_process()?
                .map(|p| (p.pid, p.vruntime));

            match selected {
                Some((pid, vruntime)) => {
                    debug!("round {round}: pid {pid} (vruntime {vruntime})");
                    *report.selections.entry(pid).or_insert(0) += 1;
                    report.rounds.push(RoundRecord {
                        round,
                        pid: Some(pid),
                        vruntime: Some(vruntime),
                    });
                    self.scheduler.tick();
                }
                None => {
                    debug!("round {round}: idle");
                    report.rounds.push(RoundRecord {
                        round,
                        pid: None,
                        vruntime: None,
                    });
                }
            }
        }

        info!(
            "simulated {} rounds: {} busy, {} idle, spread {}",
            rounds,
            report.busy_rounds(),
            report.idle_rounds(),
            report.spread()
        );
        Ok(report)
    }
}
