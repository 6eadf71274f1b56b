//! Tick loop and tick-rate governor.
//!
//! The loop parks while paused and is woken by
//! [`Evaluator::signal_to_proceed`](crate::Evaluator::signal_to_proceed).
//! While pacing is enabled it sleeps with `park_timeout` for whatever is left
//! of the tick interval, so pause, resume, retargeting and shutdown all take
//! effect without waiting out a long interval.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Instant;

use crate::evaluator::{lock, Shared};
use crate::log::Level;

/// Main tick loop. Runs until the stop flag is set.
pub(crate) fn run(shared: &Shared) {
    let control = &shared.control;
    shared.log(Level::DEBUG, "tick thread started");

    loop {
        if control.stop.load(Ordering::Acquire) {
            break;
        }
        if control.paused.load(Ordering::Acquire) {
            thread::park();
            continue;
        }

        control.retimed.store(false, Ordering::Release);
        let tick_start = Instant::now();

        // 1. Execute tick.
        shared.tick_once();

        // 2. Count it towards the measured rate.
        lock(&shared.meter).record(Instant::now());

        // 3. Sleep for the remaining budget.
        if control.use_tickrate.load(Ordering::Acquire) {
            // `None` when the interval is too long to represent; wait for a
            // wake-up instead.
            let deadline = tick_start.checked_add(control.interval());
            loop {
                if control.stop.load(Ordering::Acquire)
                    || control.paused.load(Ordering::Acquire)
                    || control.retimed.load(Ordering::Acquire)
                {
                    break;
                }
                let Some(deadline) = deadline else {
                    thread::park();
                    continue;
                };
                match deadline.checked_duration_since(Instant::now()) {
                    Some(remaining) if !remaining.is_zero() => thread::park_timeout(remaining),
                    _ => break,
                }
            }
        }
    }

    shared.log(Level::DEBUG, "tick thread stopped");
}
