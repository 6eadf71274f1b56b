//! Tick rounds: evaluation jobs and the runner that drives them.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use gridlogic_core::GateId;
use gridlogic_netlist::NetList;

use crate::error::EngineError;
use crate::metrics::TickMetrics;
use crate::pool::{Job, WorkerPool};

/// Evaluates one contiguous id range of the net list.
pub(crate) struct EvalJob {
    netlist: Arc<RwLock<NetList>>,
    lo: usize,
    hi: usize,
    changed: Mutex<Vec<GateId>>,
}

impl Job for EvalJob {
    fn run(&self) {
        let netlist = self.netlist.read().unwrap_or_else(PoisonError::into_inner);
        let mut changed = self.changed.lock().unwrap_or_else(PoisonError::into_inner);
        changed.clear();
        netlist.compute_range(self.lo..self.hi, &mut changed);
    }
}

/// Split `slots` gates into ranges for `threads` workers.
pub(crate) fn partition(
    slots: usize,
    threads: usize,
    jobs_per_worker: usize,
    min_gates_per_job: usize,
) -> Vec<(usize, usize)> {
    if slots == 0 {
        return Vec::new();
    }
    let target_jobs = (threads * jobs_per_worker).max(1);
    let chunk = slots.div_ceil(target_jobs).max(min_gates_per_job).max(1);
    (0..slots)
        .step_by(chunk)
        .map(|lo| (lo, (lo + chunk).min(slots)))
        .collect()
}

/// Owns the worker pool and the cached round. Held behind the evaluator's
/// runner mutex; whoever holds it may tick or edit.
pub(crate) struct TickRunner {
    pool: WorkerPool<EvalJob>,
    round: Arc<[EvalJob]>,
    round_key: Option<(usize, usize)>,
    jobs_per_worker: usize,
    min_gates_per_job: usize,
}

impl TickRunner {
    pub(crate) fn new(
        workers: usize,
        jobs_per_worker: usize,
        min_gates_per_job: usize,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            pool: WorkerPool::new(workers)?,
            round: Arc::from(Vec::new()),
            round_key: None,
            jobs_per_worker,
            min_gates_per_job,
        })
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.pool.thread_count()
    }

    pub(crate) fn resize(&mut self, workers: usize) -> Result<(), EngineError> {
        self.pool.resize_threads(workers)
    }

    fn round_for(&mut self, netlist: &Arc<RwLock<NetList>>, slots: usize) -> Arc<[EvalJob]> {
        let key = (slots, self.pool.thread_count());
        if self.round_key != Some(key) {
            self.round = partition(
                slots,
                key.1,
                self.jobs_per_worker,
                self.min_gates_per_job,
            )
            .into_iter()
            .map(|(lo, hi)| EvalJob {
                netlist: Arc::clone(netlist),
                lo,
                hi,
                changed: Mutex::new(Vec::new()),
            })
            .collect();
            self.round_key = Some(key);
        }
        Arc::clone(&self.round)
    }

    /// Run one tick: junctions, parallel compute, powered propagation, swap.
    ///
    /// The caller must not hold a write guard on `netlist`.
    pub(crate) fn run_tick(&mut self, netlist: &Arc<RwLock<NetList>>) -> TickMetrics {
        let start = Instant::now();
        let guard = netlist.read().unwrap_or_else(PoisonError::into_inner);
        let jobs = self.round_for(netlist, guard.slot_count());

        let mut changed = Vec::new();
        guard.resolve_junctions(&mut changed);
        if !jobs.is_empty() {
            self.pool.reset_and_load(Arc::clone(&jobs));
            self.pool.wait_for_completion();
        }
        let computed = Instant::now();

        for job in jobs.iter() {
            changed.append(&mut job.changed.lock().unwrap_or_else(PoisonError::into_inner));
        }
        guard.propagate_powered(&changed);
        guard.swap_states();
        let done = Instant::now();

        TickMetrics {
            total_us: done.duration_since(start).as_micros() as u64,
            compute_us: computed.duration_since(start).as_micros() as u64,
            propagate_us: done.duration_since(computed).as_micros() as u64,
            changed_gates: changed.len(),
            jobs: jobs.len(),
            workers: self.pool.thread_count(),
        }
    }
}
