//! User-facing [`Evaluator`] API.
//!
//! # Threads and locks
//!
//! ```text
//! caller threads            gridlogic-tick             gridlogic-worker-N
//!   get/set_state             loop:                      park on condvar
//!     tree.read                 runner.lock              netlist.read
//!     netlist.read              netlist.read             compute_range
//!   edit(|s| ..)                pool round ───────────▶  push changed ids
//!     runner.lock               propagate, swap
//!     tree.write                unlock
//!     netlist.write             park_timeout(rest of interval)
//! ```
//!
//! Lock order is runner → address tree → net list, everywhere. Since every
//! net list writer holds the runner first, no writer is ever queued on the
//! net list while a round is in flight.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gridlogic_address::AddressTree;
use gridlogic_core::{Address, AddressError, CircuitId, GateId, GateKind, Position};
use gridlogic_netlist::{GateRemap, NetList};

use crate::config::{validate_tickrate, ConfigError, EngineConfig};
use crate::error::EngineError;
use crate::log::{Level, LogSink, TracingSink};
use crate::metrics::TickMetrics;
use crate::rate::TickrateMeter;
use crate::round::TickRunner;
use crate::tick_thread;

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(PoisonError::into_inner)
}

fn interval_nanos(hz: f64) -> u64 {
    let interval = Duration::try_from_secs_f64(1.0 / hz).unwrap_or(Duration::MAX);
    u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX)
}

// ── Shared state ───────────────────────────────────────────────────

/// Flags and counters read by the tick thread without locking.
pub(crate) struct Control {
    pub(crate) paused: AtomicBool,
    pub(crate) use_tickrate: AtomicBool,
    pub(crate) interval_ns: AtomicU64,
    target_hz_bits: AtomicU64,
    pub(crate) stop: AtomicBool,
    /// Set by pacing setters; cuts the current inter-tick sleep short.
    pub(crate) retimed: AtomicBool,
    pub(crate) ticks: AtomicU64,
}

impl Control {
    pub(crate) fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_ns.load(Ordering::Acquire))
    }
}

pub(crate) struct Shared {
    pub(crate) netlist: Arc<RwLock<NetList>>,
    pub(crate) tree: RwLock<AddressTree>,
    pub(crate) runner: Mutex<TickRunner>,
    pub(crate) control: Control,
    pub(crate) meter: Mutex<TickrateMeter>,
    pub(crate) metrics: Mutex<TickMetrics>,
    pub(crate) sink: Arc<dyn LogSink>,
}

impl Shared {
    pub(crate) fn log(&self, level: Level, message: &str) {
        self.sink.log(level, message);
    }

    /// Run one tick with the runner already held.
    fn tick_with(&self, runner: &mut TickRunner) -> TickMetrics {
        let metrics = runner.run_tick(&self.netlist);
        self.control.ticks.fetch_add(1, Ordering::AcqRel);
        *lock(&self.metrics) = metrics.clone();
        metrics
    }

    /// Run one tick, waiting for any in-progress edit.
    pub(crate) fn tick_once(&self) -> TickMetrics {
        let mut runner = lock(&self.runner);
        self.tick_with(&mut runner)
    }
}

// ── EditSession ────────────────────────────────────────────────────

/// Exclusive access to the net list and address tree between two ticks.
///
/// Obtained through [`Evaluator::edit`]. Failed operations change nothing,
/// are logged at `DEBUG` and returned to the caller.
pub struct EditSession<'a> {
    netlist: RwLockWriteGuard<'a, NetList>,
    tree: RwLockWriteGuard<'a, AddressTree>,
    sink: &'a dyn LogSink,
}

impl EditSession<'_> {
    fn reject<E: Into<EngineError>>(&self, op: &str, e: E) -> EngineError {
        let e = e.into();
        self.sink.log(Level::DEBUG, &format!("{op} rejected: {e}"));
        e
    }

    /// The net list.
    pub fn netlist(&self) -> &NetList {
        &self.netlist
    }

    /// The address tree.
    pub fn tree(&self) -> &AddressTree {
        &self.tree
    }

    /// Reserve room for `additional` more gates.
    pub fn reserve(&mut self, additional: usize) {
        self.netlist.reserve(additional);
    }

    /// Add an unaddressed gate.
    pub fn add_gate(&mut self, kind: GateKind, prefer_reuse: bool) -> GateId {
        self.netlist.add_gate(kind, prefer_reuse)
    }

    /// Add a gate and record it at `address`.
    pub fn add_gate_at(
        &mut self,
        address: &Address,
        kind: GateKind,
        prefer_reuse: bool,
    ) -> Result<GateId, EngineError> {
        let id = self.netlist.next_gate_id(prefer_reuse);
        if let Err(e) = self.tree.insert(address, id) {
            return Err(self.reject("add_gate_at", e));
        }
        Ok(self.netlist.add_gate(kind, prefer_reuse))
    }

    /// Wire `src` into `dst`.
    pub fn connect_gates(&mut self, src: GateId, dst: GateId) -> Result<(), EngineError> {
        self.netlist
            .connect_gates(src, dst)
            .map_err(|e| self.reject("connect_gates", e))
    }

    /// Remove the wire `src → dst`.
    pub fn disconnect_gates(&mut self, src: GateId, dst: GateId) -> Result<(), EngineError> {
        self.netlist
            .disconnect_gates(src, dst)
            .map_err(|e| self.reject("disconnect_gates", e))
    }

    /// Wire the gate at `src` into the gate at `dst`.
    pub fn connect_at(&mut self, src: &Address, dst: &Address) -> Result<(), EngineError> {
        let (src, dst) = (self.resolve_checked(src)?, self.resolve_checked(dst)?);
        self.connect_gates(src, dst)
    }

    /// Remove gate `id`. Any address still pointing at it is dropped from
    /// the tree as well.
    pub fn decommission_gate(&mut self, id: GateId) -> Result<(), EngineError> {
        self.retire(id)?;
        let dropped = self.tree.forget(id);
        if dropped > 0 {
            self.sink.log(
                Level::DEBUG,
                &format!("decommission_gate: dropped {dropped} address(es) of gate {id}"),
            );
        }
        Ok(())
    }

    fn retire(&mut self, id: GateId) -> Result<(), EngineError> {
        self.netlist
            .decommission_gate(id)
            .map_err(|e| self.reject("decommission_gate", e))
    }

    /// Remove the gate at `address` from both the tree and the net list.
    pub fn remove_gate_at(&mut self, address: &Address) -> Result<GateId, EngineError> {
        let id = self
            .tree
            .remove(address)
            .map_err(|e| self.reject("remove_gate_at", e))?;
        self.retire(id)?;
        Ok(id)
    }

    /// Place an empty instance of `circuit` at `address`.
    pub fn make_branch(&mut self, address: &Address, circuit: CircuitId) -> Result<(), EngineError> {
        self.tree
            .make_branch(address, circuit)
            .map_err(|e| self.reject("make_branch", e))
    }

    /// Remove the instance at `address` and decommission every gate it
    /// contained. Returns the number of gates removed.
    pub fn remove_branch(&mut self, address: &Address) -> Result<usize, EngineError> {
        let ids = self
            .tree
            .remove_branch(address)
            .map_err(|e| self.reject("remove_branch", e))?;
        let mut removed = 0;
        for id in ids {
            if self.retire(id).is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Move the gate or instance at `from` to `to` within its parent.
    pub fn move_entry(&mut self, from: &Address, to: Position) -> Result<(), EngineError> {
        self.tree
            .move_entry(from, to)
            .map_err(|e| self.reject("move_entry", e))
    }

    /// Overwrite the state of gate `id`.
    pub fn set_state(&mut self, id: GateId, state: bool) -> Result<(), EngineError> {
        self.netlist
            .set_state(id, state)
            .map_err(|e| self.reject("set_state", e))
    }

    /// The gate at `address`, if any.
    pub fn resolve(&self, address: &Address) -> Option<GateId> {
        self.tree.resolve(address)
    }

    fn resolve_checked(&self, address: &Address) -> Result<GateId, EngineError> {
        resolve_checked(&self.tree, address).map_err(|e| self.reject("resolve", e))
    }

    /// Drop every gate and address.
    pub fn clear(&mut self) {
        self.netlist.clear();
        let epoch = self.netlist.epoch();
        self.tree.clear(epoch);
    }
}

fn resolve_checked(tree: &AddressTree, address: &Address) -> Result<GateId, AddressError> {
    if address.is_empty() {
        return Err(AddressError::EmptyAddress);
    }
    tree.resolve(address).ok_or(AddressError::NotFound)
}

// ── Evaluator ──────────────────────────────────────────────────────

/// Owns the net list, the address tree, the worker pool and the tick
/// thread.
///
/// `Evaluator` is `Sync`: state reads and writes, pacing control and edits
/// may come from any thread.
pub struct Evaluator {
    shared: Arc<Shared>,
    tick_thread: Option<JoinHandle<()>>,
}

impl Evaluator {
    /// Create an evaluator and spawn its tick thread and worker pool.
    pub fn new(config: EngineConfig, sink: Arc<dyn LogSink>) -> Result<Self, EngineError> {
        config.validate()?;
        let workers = config.resolved_worker_count();
        let runner = TickRunner::new(workers, config.jobs_per_worker, config.min_gates_per_job)
            .inspect_err(|e| sink.log(Level::ERROR, &e.to_string()))?;

        let shared = Arc::new(Shared {
            netlist: Arc::new(RwLock::new(NetList::new())),
            tree: RwLock::new(AddressTree::new(config.root_circuit)),
            runner: Mutex::new(runner),
            control: Control {
                paused: AtomicBool::new(config.start_paused),
                use_tickrate: AtomicBool::new(config.use_tickrate),
                interval_ns: AtomicU64::new(interval_nanos(config.target_tickrate_hz)),
                target_hz_bits: AtomicU64::new(config.target_tickrate_hz.to_bits()),
                stop: AtomicBool::new(false),
                retimed: AtomicBool::new(false),
                ticks: AtomicU64::new(0),
            },
            meter: Mutex::new(TickrateMeter::new(
                config.tickrate_window,
                config.tickrate_buckets,
                Instant::now(),
            )),
            metrics: Mutex::new(TickMetrics::default()),
            sink,
        });

        let tick_shared = Arc::clone(&shared);
        let tick_thread = thread::Builder::new()
            .name("gridlogic-tick".into())
            .spawn(move || tick_thread::run(&tick_shared))
            .map_err(|e| {
                let err = EngineError::ThreadSpawnFailed {
                    reason: format!("gridlogic-tick: {e}"),
                };
                shared.log(Level::ERROR, &err.to_string());
                err
            })?;

        shared.log(
            Level::INFO,
            &format!(
                "evaluator started: {workers} workers, target {} Hz, {}",
                config.target_tickrate_hz,
                if config.start_paused { "paused" } else { "running" }
            ),
        );
        Ok(Self {
            shared,
            tick_thread: Some(tick_thread),
        })
    }

    /// [`new`](Self::new) with a [`TracingSink`].
    pub fn with_tracing(config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(config, Arc::new(TracingSink))
    }

    // ── Pacing control ─────────────────────────────────────────────

    /// Wake the tick thread so it re-reads the control flags now.
    pub fn signal_to_proceed(&self) {
        if let Some(handle) = &self.tick_thread {
            handle.thread().unpark();
        }
    }

    /// Pause or resume the tick loop. Takes effect at the next tick
    /// boundary.
    pub fn set_pause(&self, paused: bool) {
        let was = self.shared.control.paused.swap(paused, Ordering::AcqRel);
        if was == paused {
            return;
        }
        if !paused {
            lock(&self.shared.meter).reset(Instant::now());
        }
        self.shared.log(
            Level::DEBUG,
            if paused { "simulation paused" } else { "simulation resumed" },
        );
        self.signal_to_proceed();
    }

    /// Whether the tick loop is paused.
    pub fn is_paused(&self) -> bool {
        self.shared.control.paused.load(Ordering::Acquire)
    }

    /// Set the target rate in ticks per second.
    pub fn set_target_tickrate(&self, hz: f64) -> Result<(), ConfigError> {
        validate_tickrate(hz)?;
        let control = &self.shared.control;
        control.target_hz_bits.store(hz.to_bits(), Ordering::Release);
        control.interval_ns.store(interval_nanos(hz), Ordering::Release);
        control.retimed.store(true, Ordering::Release);
        self.signal_to_proceed();
        Ok(())
    }

    /// Set the target rate in ticks per minute.
    pub fn set_target_ticks_per_minute(&self, ticks_per_minute: f64) -> Result<(), ConfigError> {
        self.set_target_tickrate(ticks_per_minute / 60.0)
    }

    /// Target rate in ticks per second.
    pub fn target_tickrate(&self) -> f64 {
        f64::from_bits(self.shared.control.target_hz_bits.load(Ordering::Acquire))
    }

    /// Enable or disable pacing. Unpaced, ticks run back to back.
    pub fn set_use_tickrate(&self, enabled: bool) {
        let control = &self.shared.control;
        control.use_tickrate.store(enabled, Ordering::Release);
        control.retimed.store(true, Ordering::Release);
        self.signal_to_proceed();
    }

    /// Whether pacing is enabled.
    pub fn uses_tickrate(&self) -> bool {
        self.shared.control.use_tickrate.load(Ordering::Acquire)
    }

    /// Measured ticks per second over the configured window. Exactly `0.0`
    /// while paused.
    pub fn get_real_tickrate(&self) -> f64 {
        if self.is_paused() {
            return 0.0;
        }
        lock(&self.shared.meter).rate(Instant::now())
    }

    // ── Structure ──────────────────────────────────────────────────

    /// Run `f` with exclusive access to the net list and address tree.
    ///
    /// Blocks until the current tick (if any) finishes; the tick loop
    /// waits for `f` to return before starting the next one.
    pub fn edit<R>(&self, f: impl FnOnce(&mut EditSession<'_>) -> R) -> R {
        let _runner = lock(&self.shared.runner);
        let mut session = EditSession {
            tree: write(&self.shared.tree),
            netlist: write(&self.shared.netlist),
            sink: self.shared.sink.as_ref(),
        };
        f(&mut session)
    }

    /// Run `f` with shared access to the net list and address tree.
    pub fn inspect<R>(&self, f: impl FnOnce(&NetList, &AddressTree) -> R) -> R {
        let tree = read(&self.shared.tree);
        let netlist = read(&self.shared.netlist);
        f(&netlist, &tree)
    }

    /// Renumber gates densely and remap the address tree.
    ///
    /// Only valid while paused; returns [`EngineError::NotPaused`]
    /// otherwise.
    pub fn compress_gates(&self) -> Result<GateRemap, EngineError> {
        let _runner = lock(&self.shared.runner);
        if !self.is_paused() {
            self.shared
                .log(Level::DEBUG, "compress_gates rejected: simulation is running");
            return Err(EngineError::NotPaused);
        }
        let mut tree = write(&self.shared.tree);
        let mut netlist = write(&self.shared.netlist);
        let remap = netlist.compress_gates();
        tree.on_compress(&remap);
        self.shared.log(
            Level::INFO,
            &format!(
                "compressed gates: {} holes removed, {} gates moved, epoch {}",
                remap.removed_count(),
                remap.moved().count(),
                remap.epoch()
            ),
        );
        Ok(remap)
    }

    /// The gate at `address`, if any.
    pub fn resolve(&self, address: &Address) -> Option<GateId> {
        read(&self.shared.tree).resolve(address)
    }

    // ── State ──────────────────────────────────────────────────────

    /// Current state of the gate at `address`. Unresolvable addresses
    /// read LOW.
    pub fn get_state(&self, address: &Address) -> bool {
        let tree = read(&self.shared.tree);
        let Some(id) = tree.resolve(address) else {
            return false;
        };
        read(&self.shared.netlist).get_state(id)
    }

    /// Overwrite the state of the gate at `address`.
    pub fn set_state(&self, address: &Address, state: bool) -> Result<(), EngineError> {
        let tree = read(&self.shared.tree);
        let id = resolve_checked(&tree, address)?;
        read(&self.shared.netlist).set_state(id, state)?;
        Ok(())
    }

    /// Current states of the gates at `addresses`, in order.
    pub fn get_bulk_states(&self, addresses: &[Address]) -> Vec<bool> {
        let tree = read(&self.shared.tree);
        let netlist = read(&self.shared.netlist);
        addresses
            .iter()
            .map(|a| tree.resolve(a).is_some_and(|id| netlist.get_state(id)))
            .collect()
    }

    /// Current states of the gates at `addresses`, each resolved inside
    /// the instance at `origin`.
    pub fn get_bulk_states_from(&self, origin: &Address, addresses: &[Address]) -> Vec<bool> {
        let tree = read(&self.shared.tree);
        let netlist = read(&self.shared.netlist);
        addresses
            .iter()
            .map(|a| tree.resolve_from(origin, a).is_some_and(|id| netlist.get_state(id)))
            .collect()
    }

    /// Write `states[i]` to the gate at `addresses[i]`.
    ///
    /// Pairs beyond the shorter slice are ignored. Every resolvable pair is
    /// written; the first failure, if any, is returned.
    pub fn set_bulk_states(&self, addresses: &[Address], states: &[bool]) -> Result<(), EngineError> {
        let tree = read(&self.shared.tree);
        let netlist = read(&self.shared.netlist);
        let mut first_err = None;
        for (address, &state) in addresses.iter().zip(states) {
            let result = resolve_checked(&tree, address)
                .map_err(EngineError::from)
                .and_then(|id| netlist.set_state(id, state).map_err(EngineError::from));
            if let Err(e) = result {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Snapshot of every slot's current state; `None` for holes.
    pub fn get_current_state(&self) -> Vec<Option<bool>> {
        read(&self.shared.netlist).current_states()
    }

    /// Return every gate to its kind's reset state at a tick boundary.
    pub fn reset_states(&self) {
        let _runner = lock(&self.shared.runner);
        read(&self.shared.netlist).reset_states();
        self.shared.log(Level::DEBUG, "gate states reset");
    }

    // ── Stepping and workers ───────────────────────────────────────

    /// Run exactly `n` ticks on the calling thread. Only valid while
    /// paused.
    pub fn step(&self, n: u64) -> Result<(), EngineError> {
        if self.tick_thread.is_none() {
            return Err(EngineError::ShutDown);
        }
        let mut runner = lock(&self.shared.runner);
        if !self.is_paused() {
            return Err(EngineError::NotPaused);
        }
        for _ in 0..n {
            self.shared.tick_with(&mut runner);
        }
        Ok(())
    }

    /// Resize the worker pool. Zero is raised to one.
    pub fn set_worker_count(&self, workers: usize) -> Result<(), EngineError> {
        let mut runner = lock(&self.shared.runner);
        runner.resize(workers).inspect_err(|e| {
            self.shared.log(Level::ERROR, &e.to_string());
        })?;
        self.shared.log(
            Level::INFO,
            &format!("worker pool resized to {}", runner.worker_count()),
        );
        Ok(())
    }

    /// Number of pool workers.
    pub fn worker_count(&self) -> usize {
        lock(&self.shared.runner).worker_count()
    }

    /// Total ticks run since creation, by the tick loop and by
    /// [`step`](Self::step).
    pub fn tick_count(&self) -> u64 {
        self.shared.control.ticks.load(Ordering::Acquire)
    }

    /// Metrics of the most recent tick.
    pub fn last_metrics(&self) -> TickMetrics {
        lock(&self.shared.metrics).clone()
    }

    // ── Shutdown ───────────────────────────────────────────────────

    /// Stop and join the tick thread. Idempotent; also run on drop.
    ///
    /// State reads and edits keep working afterwards; ticking does not.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.tick_thread.take() else {
            return;
        };
        self.shared.control.stop.store(true, Ordering::Release);
        handle.thread().unpark();
        if handle.join().is_err() {
            self.shared.log(Level::ERROR, "tick thread panicked");
        }
        self.shared.log(
            Level::INFO,
            &format!("evaluator shut down after {} ticks", self.tick_count()),
        );
    }

    /// Whether [`shutdown`](Self::shutdown) has run.
    pub fn is_shut_down(&self) -> bool {
        self.tick_thread.is_none()
    }
}

impl Drop for Evaluator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NullSink;

    fn paused() -> Evaluator {
        let config = EngineConfig {
            worker_count: Some(2),
            ..Default::default()
        };
        Evaluator::new(config, Arc::new(NullSink)).unwrap()
    }

    fn leaf(x: i32, y: i32) -> Address {
        Address::leaf(Position::new(x, y))
    }

    #[test]
    fn starts_paused_with_zero_rate() {
        let ev = paused();
        assert!(ev.is_paused());
        assert_eq!(ev.get_real_tickrate(), 0.0);
        assert_eq!(ev.tick_count(), 0);
    }

    #[test]
    fn add_gate_at_occupied_position_changes_nothing() {
        let ev = paused();
        ev.edit(|s| {
            s.add_gate_at(&leaf(0, 0), GateKind::Switch, true).unwrap();
            let err = s.add_gate_at(&leaf(0, 0), GateKind::And, true);
            assert_eq!(err, Err(EngineError::Address(AddressError::PositionOccupied)));
            assert_eq!(s.netlist().slot_count(), 1);
        });
    }

    #[test]
    fn remove_branch_decommissions_contents() {
        let ev = paused();
        let inst = leaf(4, 4);
        let inner = Address::from(&[Position::new(4, 4), Position::new(0, 0)][..]);
        ev.edit(|s| {
            s.make_branch(&inst, CircuitId(7)).unwrap();
            s.add_gate_at(&inner, GateKind::Or, true).unwrap();
            assert_eq!(s.remove_branch(&inst), Ok(1));
            assert_eq!(s.netlist().gate_count(), 0);
        });
        assert_eq!(ev.resolve(&inner), None);
    }

    #[test]
    fn decommission_gate_drops_its_address() {
        let ev = paused();
        ev.edit(|s| {
            let id = s.add_gate_at(&leaf(0, 0), GateKind::Switch, true).unwrap();
            s.add_gate_at(&leaf(1, 0), GateKind::Or, true).unwrap();
            s.decommission_gate(id).unwrap();
            assert_eq!(s.resolve(&leaf(0, 0)), None);
            assert_eq!(s.tree().len(), 1);

            let reused = s.add_gate_at(&leaf(2, 0), GateKind::And, true).unwrap();
            assert_eq!(reused, id);
            assert_eq!(s.resolve(&leaf(0, 0)), None);
            assert_eq!(s.resolve(&leaf(2, 0)), Some(id));
        });
        assert!(ev.set_state(&leaf(0, 0), true).is_err());
    }

    #[test]
    fn set_state_on_unknown_address() {
        let ev = paused();
        assert_eq!(
            ev.set_state(&leaf(1, 1), true),
            Err(EngineError::Address(AddressError::NotFound))
        );
        assert_eq!(
            ev.set_state(&Address::new(), true),
            Err(EngineError::Address(AddressError::EmptyAddress))
        );
        assert!(!ev.get_state(&leaf(1, 1)));
    }

    #[test]
    fn set_bulk_states_reports_first_failure() {
        let ev = paused();
        ev.edit(|s| {
            s.add_gate_at(&leaf(0, 0), GateKind::Switch, true).unwrap();
            s.add_gate_at(&leaf(1, 0), GateKind::Switch, true).unwrap();
        });
        let addrs = [leaf(0, 0), leaf(9, 9), leaf(1, 0)];
        let res = ev.set_bulk_states(&addrs, &[true, true, true]);
        assert_eq!(res, Err(EngineError::Address(AddressError::NotFound)));
        assert_eq!(ev.get_bulk_states(&addrs), vec![true, false, true]);
    }

    #[test]
    fn pacing_setters_validate() {
        let ev = paused();
        assert!(ev.set_target_tickrate(0.0).is_err());
        ev.set_target_ticks_per_minute(600.0).unwrap();
        assert_eq!(ev.target_tickrate(), 10.0);
        ev.set_use_tickrate(false);
        assert!(!ev.uses_tickrate());
    }

    #[test]
    fn step_after_shutdown_fails() {
        let mut ev = paused();
        ev.shutdown();
        ev.shutdown();
        assert!(ev.is_shut_down());
        assert_eq!(ev.step(1), Err(EngineError::ShutDown));
    }

    #[test]
    fn clear_resets_tree_and_netlist() {
        let ev = paused();
        ev.edit(|s| {
            s.add_gate_at(&leaf(0, 0), GateKind::Switch, true).unwrap();
            s.clear();
            assert_eq!(s.netlist().slot_count(), 0);
            assert!(s.tree().is_empty());
            assert_eq!(s.tree().epoch(), s.netlist().epoch());
        });
    }
}
