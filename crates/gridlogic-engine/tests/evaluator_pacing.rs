//! Integration test: the free-running tick loop.
//!
//! Covers pause semantics, pacing to a target rate, unthrottled running and
//! state access from several threads while ticks are in flight. Timing
//! assertions use generous bounds and poll with a deadline rather than
//! sleeping for a fixed span.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gridlogic_core::{Address, GateKind, Position};
use gridlogic_engine::{ChannelSink, EngineConfig, EngineError, Evaluator, Level, NullSink};

const DEADLINE: Duration = Duration::from_secs(10);

fn leaf(x: i32, y: i32) -> Address {
    Address::leaf(Position::new(x, y))
}

fn evaluator(config: EngineConfig) -> Evaluator {
    Evaluator::new(config, Arc::new(NullSink)).unwrap()
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

#[test]
fn paused_evaluator_does_not_tick() {
    let ev = evaluator(EngineConfig {
        use_tickrate: false,
        ..Default::default()
    });
    thread::sleep(Duration::from_millis(50));
    assert_eq!(ev.tick_count(), 0);
    assert_eq!(ev.get_real_tickrate(), 0.0);
}

#[test]
fn unthrottled_loop_reports_positive_rate() {
    let ev = evaluator(EngineConfig {
        use_tickrate: false,
        start_paused: false,
        ..Default::default()
    });
    assert!(wait_until(|| ev.tick_count() > 100));
    assert!(ev.get_real_tickrate() > 0.0);

    ev.set_pause(true);
    assert_eq!(ev.get_real_tickrate(), 0.0);
    // At most one tick can still be in flight when the pause lands.
    thread::sleep(Duration::from_millis(20));
    let frozen = ev.tick_count();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(ev.tick_count(), frozen);
}

#[test]
fn paced_loop_stays_near_target() {
    let ev = evaluator(EngineConfig {
        target_tickrate_hz: 50.0,
        start_paused: false,
        ..Default::default()
    });
    let start = Instant::now();
    thread::sleep(Duration::from_millis(600));
    let ticks = ev.tick_count();
    let elapsed = start.elapsed().as_secs_f64();

    // Pacing never runs ahead of the target.
    assert!(ticks as f64 <= elapsed * 50.0 + 2.0, "{ticks} ticks in {elapsed}s");
    assert!(ticks >= 5, "{ticks} ticks in {elapsed}s");
    let rate = ev.get_real_tickrate();
    assert!(rate > 0.0 && rate < 75.0, "rate {rate}");
}

#[test]
fn retargeting_wakes_a_long_sleep() {
    let ev = evaluator(EngineConfig {
        target_tickrate_hz: 0.01,
        start_paused: false,
        ..Default::default()
    });
    assert!(wait_until(|| ev.tick_count() >= 1));
    ev.set_target_ticks_per_minute(60_000.0).unwrap();
    assert_eq!(ev.target_tickrate(), 1000.0);
    assert!(wait_until(|| ev.tick_count() >= 20));
}

#[test]
fn shutdown_interrupts_a_long_sleep() {
    let mut ev = evaluator(EngineConfig {
        target_tickrate_hz: 0.001,
        start_paused: false,
        ..Default::default()
    });
    assert!(wait_until(|| ev.tick_count() >= 1));
    let start = Instant::now();
    ev.shutdown();
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn switches_are_last_writer_wins_under_load() {
    let ev = Arc::new(evaluator(EngineConfig {
        worker_count: Some(2),
        use_tickrate: false,
        min_gates_per_job: 1,
        ..Default::default()
    }));
    let lanes = 4;
    ev.edit(|s| {
        for x in 0..lanes {
            s.add_gate_at(&leaf(x, 0), GateKind::Switch, true)?;
            s.add_gate_at(&leaf(x, 1), GateKind::Junction, true)?;
            s.connect_at(&leaf(x, 0), &leaf(x, 1))?;
        }
        Ok::<_, EngineError>(())
    })
    .unwrap();
    ev.set_pause(false);

    let handles: Vec<_> = (0..lanes)
        .map(|x| {
            let ev = Arc::clone(&ev);
            thread::spawn(move || {
                let sw = leaf(x, 0);
                for i in 0..500 {
                    let v = i % 3 == 0;
                    ev.set_state(&sw, v).unwrap();
                    assert_eq!(ev.get_state(&sw), v);
                }
                ev.set_state(&sw, true).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let lamps: Vec<Address> = (0..lanes).map(|x| leaf(x, 1)).collect();
    assert!(wait_until(|| ev.get_bulk_states(&lamps).iter().all(|&on| on)));
}

#[test]
fn edits_interleave_with_running_ticks() {
    let (sink, rx) = ChannelSink::new();
    let ev = Evaluator::new(
        EngineConfig {
            use_tickrate: false,
            start_paused: false,
            ..Default::default()
        },
        Arc::new(sink),
    )
    .unwrap();

    for x in 0..50 {
        ev.edit(|s| s.add_gate_at(&leaf(x, 0), GateKind::ConstantOn, true))
            .unwrap();
    }
    let last = leaf(49, 0);
    assert!(wait_until(|| ev.get_state(&last)));
    ev.inspect(|netlist, tree| {
        assert_eq!(netlist.gate_count(), 50);
        assert_eq!(tree.len(), 50);
    });

    let started = rx
        .try_iter()
        .any(|r| r.level == Level::INFO && r.message.contains("evaluator started"));
    assert!(started);
}
