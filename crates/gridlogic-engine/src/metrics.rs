//! Per-tick performance metrics.

/// Timing and work counts collected during a single tick.
///
/// All durations are in microseconds. The evaluator stores the metrics of
/// the most recent tick; read them with
/// [`Evaluator::last_metrics`](crate::Evaluator::last_metrics).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Time spent in the parallel next-state round.
    pub compute_us: u64,
    /// Time spent updating powered flags and swapping buffers.
    pub propagate_us: u64,
    /// Number of gates whose state changed this tick.
    pub changed_gates: usize,
    /// Number of jobs in the round.
    pub jobs: usize,
    /// Number of pool workers available for the round.
    pub workers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = TickMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.compute_us, 0);
        assert_eq!(m.propagate_us, 0);
        assert_eq!(m.changed_gates, 0);
        assert_eq!(m.jobs, 0);
        assert_eq!(m.workers, 0);
    }
}
