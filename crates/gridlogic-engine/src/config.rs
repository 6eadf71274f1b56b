//! Engine configuration and validation.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use gridlogic_core::CircuitId;

use crate::rate::MAX_BUCKETS;

// ── EngineConfig ───────────────────────────────────────────────────

/// Configuration for an [`Evaluator`](crate::Evaluator).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of pool worker threads. `None` = auto-detect
    /// (`available_parallelism / 2`, clamped to `[1, 64]`).
    pub worker_count: Option<usize>,
    /// Target tick rate in ticks per second. Default: 40.0 (2400 per minute).
    pub target_tickrate_hz: f64,
    /// Whether the tick loop paces itself to `target_tickrate_hz`.
    /// When `false`, ticks run back to back. Default: `true`.
    pub use_tickrate: bool,
    /// Whether the evaluator starts paused. Default: `true`.
    pub start_paused: bool,
    /// Jobs per worker per tick round. More jobs balance uneven ranges
    /// at the cost of more claims. Default: 4.
    pub jobs_per_worker: usize,
    /// Lower bound on gates per job, so small net lists are not split
    /// into jobs that cost more to claim than to run. Default: 64.
    pub min_gates_per_job: usize,
    /// Span over which the real tick rate is measured. Default: 1 s.
    pub tickrate_window: Duration,
    /// Number of buckets the measurement window is divided into, at most
    /// [`MAX_BUCKETS`]. Default: 8.
    pub tickrate_buckets: usize,
    /// Circuit elaborated at the root of the address tree. Default: `CircuitId(0)`.
    pub root_circuit: CircuitId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            target_tickrate_hz: 40.0,
            use_tickrate: true,
            start_paused: true,
            jobs_per_worker: 4,
            min_gates_per_job: 64,
            tickrate_window: Duration::from_secs(1),
            tickrate_buckets: 8,
            root_circuit: CircuitId(0),
        }
    }
}

impl EngineConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tickrate(self.target_tickrate_hz)?;
        if self.worker_count == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.jobs_per_worker == 0 {
            return Err(ConfigError::ZeroJobsPerWorker);
        }
        if self.min_gates_per_job == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.tickrate_window.is_zero()
            || self.tickrate_buckets == 0
            || self.tickrate_buckets > MAX_BUCKETS
        {
            return Err(ConfigError::InvalidWindow {
                window: self.tickrate_window,
                buckets: self.tickrate_buckets,
            });
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / 2).clamp(1, 64)
            }
        }
    }
}

/// Reject tick rates that are NaN, infinite, zero, or negative.
pub(crate) fn validate_tickrate(hz: f64) -> Result<(), ConfigError> {
    if !hz.is_finite() || hz <= 0.0 {
        return Err(ConfigError::InvalidTickRate { value: hz });
    }
    Ok(())
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`EngineConfig::validate()`] and the pacing setters.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Tick rate is NaN, infinite, zero, or negative.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// `worker_count` is `Some(0)`.
    ZeroWorkers,
    /// `jobs_per_worker` is zero.
    ZeroJobsPerWorker,
    /// `min_gates_per_job` is zero.
    ZeroChunkSize,
    /// The tick-rate window is empty, or its bucket count is zero or above
    /// [`MAX_BUCKETS`].
    InvalidWindow {
        /// Configured window.
        window: Duration,
        /// Configured bucket count.
        buckets: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTickRate { value } => {
                write!(f, "tick rate must be finite and positive, got {value}")
            }
            Self::ZeroWorkers => write!(f, "worker_count must be at least 1"),
            Self::ZeroJobsPerWorker => write!(f, "jobs_per_worker must be at least 1"),
            Self::ZeroChunkSize => write!(f, "min_gates_per_job must be at least 1"),
            Self::InvalidWindow { window, buckets } => write!(
                f,
                "tickrate window {window:?} with {buckets} buckets is invalid"
            ),
        }
    }
}

impl Error for ConfigError {}
