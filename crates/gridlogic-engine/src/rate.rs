//! Windowed tick-rate measurement.
//!
//! The window is split into equal buckets arranged as a ring. Ticks are
//! counted into the bucket covering the moment they finished; buckets that
//! fall out of the window are zeroed as time advances. The reported rate is
//! the windowed count divided by the span the window actually covers, so a
//! freshly reset meter reports a sensible rate before a full window has
//! elapsed.

use std::time::{Duration, Instant};

/// Largest bucket count a meter accepts.
pub const MAX_BUCKETS: usize = 4096;

/// Bucketed ticks-per-second meter.
#[derive(Clone, Debug)]
pub struct TickrateMeter {
    buckets: Vec<u64>,
    pos: usize,
    bucket_len: Duration,
    bucket_start: Instant,
    since: Instant,
    total: u64,
}

impl TickrateMeter {
    /// A meter covering `window`, split into `buckets` buckets, starting at
    /// `now`. Zero values are raised to the smallest usable size and
    /// `buckets` is capped at [`MAX_BUCKETS`].
    pub fn new(window: Duration, buckets: usize, now: Instant) -> Self {
        let buckets = buckets.clamp(1, MAX_BUCKETS);
        let bucket_len = (window / buckets as u32).max(Duration::from_micros(1));
        Self {
            buckets: vec![0; buckets],
            pos: 0,
            bucket_len,
            bucket_start: now,
            since: now,
            total: 0,
        }
    }

    /// Forget every recorded tick and restart the window at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.buckets.iter_mut().for_each(|b| *b = 0);
        self.pos = 0;
        self.bucket_start = now;
        self.since = now;
        self.total = 0;
    }

    /// Count one tick finishing at `now`.
    pub fn record(&mut self, now: Instant) {
        self.advance(now);
        self.buckets[self.pos] += 1;
        self.total += 1;
    }

    /// Ticks per second over the window ending at `now`.
    pub fn rate(&mut self, now: Instant) -> f64 {
        self.advance(now);
        let full = self.bucket_len * (self.buckets.len() as u32 - 1);
        let covered = now
            .saturating_duration_since(self.since)
            .min(full + now.saturating_duration_since(self.bucket_start));
        if covered.is_zero() {
            return 0.0;
        }
        self.total as f64 / covered.as_secs_f64()
    }

    fn advance(&mut self, now: Instant) {
        let n = self.buckets.len();
        let elapsed = now.saturating_duration_since(self.bucket_start);
        if elapsed < self.bucket_len {
            return;
        }
        let steps = (elapsed.as_nanos() / self.bucket_len.as_nanos()) as usize;
        if steps >= n {
            // The whole window has gone by.
            self.buckets.iter_mut().for_each(|b| *b = 0);
            self.total = 0;
            self.bucket_start = now;
            return;
        }
        for _ in 0..steps {
            self.pos = (self.pos + 1) % n;
            self.total -= self.buckets[self.pos];
            self.buckets[self.pos] = 0;
        }
        self.bucket_start += self.bucket_len * steps as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(1);

    #[test]
    fn oversized_bucket_counts_are_capped() {
        let t0 = Instant::now();
        let mut m = TickrateMeter::new(WINDOW, usize::MAX, t0);
        m.record(t0 + WINDOW / 2);
        assert!(m.rate(t0 + WINDOW) > 0.0);
        let m = TickrateMeter::new(WINDOW, (u32::MAX as usize) + 1, t0);
        assert_eq!(m.buckets.len(), MAX_BUCKETS);
    }

    #[test]
    fn fresh_meter_reads_zero() {
        let t0 = Instant::now();
        let mut m = TickrateMeter::new(WINDOW, 8, t0);
        assert_eq!(m.rate(t0), 0.0);
        assert_eq!(m.rate(t0 + Duration::from_millis(500)), 0.0);
    }

    #[test]
    fn steady_rate_is_measured() {
        let t0 = Instant::now();
        let mut m = TickrateMeter::new(WINDOW, 8, t0);
        // 100 Hz for two seconds.
        for i in 1..=200u64 {
            m.record(t0 + Duration::from_millis(i * 10));
        }
        let r = m.rate(t0 + Duration::from_millis(2000));
        assert!((r - 100.0).abs() < 15.0, "rate {r}");
    }

    #[test]
    fn partial_window_is_normalised_by_covered_span() {
        let t0 = Instant::now();
        let mut m = TickrateMeter::new(WINDOW, 8, t0);
        for i in 1..=25u64 {
            m.record(t0 + Duration::from_millis(i * 10));
        }
        let r = m.rate(t0 + Duration::from_millis(250));
        assert!((r - 100.0).abs() < 1.0, "rate {r}");
    }

    #[test]
    fn old_ticks_age_out() {
        let t0 = Instant::now();
        let mut m = TickrateMeter::new(WINDOW, 8, t0);
        for i in 1..=50u64 {
            m.record(t0 + Duration::from_millis(i * 10));
        }
        assert_eq!(m.rate(t0 + Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn reset_clears_history() {
        let t0 = Instant::now();
        let mut m = TickrateMeter::new(WINDOW, 8, t0);
        m.record(t0 + Duration::from_millis(10));
        let t1 = t0 + Duration::from_millis(20);
        m.reset(t1);
        assert_eq!(m.rate(t1 + Duration::from_millis(100)), 0.0);
    }
}
