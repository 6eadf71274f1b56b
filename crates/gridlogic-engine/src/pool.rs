//! Persistent worker pool executing one round of jobs per tick.
//!
//! # Protocol
//!
//! ```text
//! caller                          worker i
//!   reset_and_load(jobs)            park on condvar until
//!     wait_for_completion()           retire[i] || stop || epoch != local
//!     lock; epoch += 1; publish     local = epoch; jobs = round
//!     cursor = epoch << 32          loop:
//!     unlock; notify_all              cur = cursor
//!   wait_for_completion()             cur.epoch != local → resync
//!     spin on completed               cur.index >= len   → park
//!                                     CAS cursor += 1 → run job
//! ```
//!
//! The claim cursor packs the round epoch into its upper 32 bits, so a
//! worker still holding a finished round can never claim an index of a
//! newer one: its compare-exchange fails on the epoch half.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::EngineError;

/// One unit of work within a round.
pub trait Job: Send + Sync + 'static {
    /// Execute the job. Called exactly once per round.
    fn run(&self);
}

const INDEX_MASK: u64 = 0xFFFF_FFFF;

struct PoolState<J> {
    jobs: Arc<[J]>,
    epoch: u32,
    stop: bool,
    retire: Vec<bool>,
}

struct PoolShared<J> {
    state: Mutex<PoolState<J>>,
    wake: Condvar,
    /// `(epoch << 32) | next unclaimed index`.
    cursor: AtomicU64,
    round_len: AtomicUsize,
    completed: AtomicUsize,
}

impl<J> PoolShared<J> {
    fn lock(&self) -> MutexGuard<'_, PoolState<J>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts a claimed job as completed even if it panics.
struct CompletionGuard<'a>(&'a AtomicUsize);

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

/// A fixed set of named worker threads that execute rounds of `J`.
pub struct WorkerPool<J: Job> {
    shared: Arc<PoolShared<J>>,
    workers: Vec<JoinHandle<()>>,
}

impl<J: Job> WorkerPool<J> {
    /// Spawn a pool of `threads` workers (at least one).
    pub fn new(threads: usize) -> Result<Self, EngineError> {
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                jobs: Arc::from(Vec::new()),
                epoch: 0,
                stop: false,
                retire: Vec::new(),
            }),
            wake: Condvar::new(),
            cursor: AtomicU64::new(0),
            round_len: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });
        let mut pool = Self {
            shared,
            workers: Vec::new(),
        };
        pool.spawn_up_to(threads.max(1))?;
        Ok(pool)
    }

    /// Number of live workers.
    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Publish a new round and return immediately.
    ///
    /// Waits for the previous round to complete first, so rounds never
    /// overlap.
    pub fn reset_and_load(&self, jobs: Arc<[J]>) {
        self.wait_for_completion();
        let len = jobs.len();
        {
            let mut st = self.shared.lock();
            st.epoch = st.epoch.wrapping_add(1);
            st.jobs = jobs;
            self.shared.completed.store(0, Ordering::Release);
            self.shared.round_len.store(len, Ordering::Release);
            self.shared
                .cursor
                .store(u64::from(st.epoch) << 32, Ordering::Release);
        }
        self.shared.wake.notify_all();
    }

    /// Spin until every job of the current round has run.
    pub fn wait_for_completion(&self) {
        while self.shared.completed.load(Ordering::Acquire)
            < self.shared.round_len.load(Ordering::Acquire)
        {
            thread::yield_now();
        }
    }

    /// Spin until every job of the current round has been claimed. Claimed
    /// jobs may still be running.
    pub fn wait_for_empty(&self) {
        while ((self.shared.cursor.load(Ordering::Acquire) & INDEX_MASK) as usize)
            < self.shared.round_len.load(Ordering::Acquire)
        {
            thread::yield_now();
        }
    }

    /// Grow or shrink the pool to `threads` workers (at least one).
    ///
    /// Shrinking drains the current round, then retires and joins the
    /// excess workers.
    pub fn resize_threads(&mut self, threads: usize) -> Result<(), EngineError> {
        let threads = threads.max(1);
        if threads > self.workers.len() {
            return self.spawn_up_to(threads);
        }
        if threads < self.workers.len() {
            self.wait_for_completion();
            {
                let mut st = self.shared.lock();
                for flag in st.retire.iter_mut().skip(threads) {
                    *flag = true;
                }
            }
            self.shared.wake.notify_all();
            for handle in self.workers.drain(threads..) {
                let _ = handle.join();
            }
            self.shared.lock().retire.truncate(threads);
        }
        Ok(())
    }

    fn spawn_up_to(&mut self, threads: usize) -> Result<(), EngineError> {
        while self.workers.len() < threads {
            let index = self.workers.len();
            self.shared.lock().retire.push(false);
            let shared = Arc::clone(&self.shared);
            let spawned = thread::Builder::new()
                .name(format!("gridlogic-worker-{index}"))
                .spawn(move || worker_loop(&shared, index));
            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(e) => {
                    self.shared.lock().retire.truncate(index);
                    return Err(EngineError::ThreadSpawnFailed {
                        reason: format!("gridlogic-worker-{index}: {e}"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<J: Job> Drop for WorkerPool<J> {
    fn drop(&mut self) {
        self.wait_for_completion();
        self.shared.lock().stop = true;
        self.shared.wake.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop<J: Job>(shared: &PoolShared<J>, index: usize) {
    // Start one epoch behind so a worker spawned mid-round helps finish it.
    let mut local_epoch = shared.lock().epoch.wrapping_sub(1);
    let mut jobs: Arc<[J]> = Arc::from(Vec::new());
    loop {
        {
            let mut st = shared.lock();
            loop {
                if st.stop || st.retire.get(index).copied().unwrap_or(true) {
                    return;
                }
                if st.epoch != local_epoch {
                    local_epoch = st.epoch;
                    jobs = Arc::clone(&st.jobs);
                    break;
                }
                st = shared.wake.wait(st).unwrap_or_else(PoisonError::into_inner);
            }
        }
        claim_and_run(shared, local_epoch, &jobs);
    }
}

fn claim_and_run<J: Job>(shared: &PoolShared<J>, epoch: u32, jobs: &[J]) {
    loop {
        let cur = shared.cursor.load(Ordering::Acquire);
        if (cur >> 32) as u32 != epoch {
            return;
        }
        let index = (cur & INDEX_MASK) as usize;
        if index >= jobs.len() {
            return;
        }
        if shared
            .cursor
            .compare_exchange_weak(cur, cur + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let _done = CompletionGuard(&shared.completed);
            jobs[index].run();
        }
    }
}
