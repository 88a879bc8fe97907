//! Idempotence and concurrency properties of `Trace`.

use perftrace::{ManualClock, Trace};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn trace_at(start_ms: i64) -> (Arc<ManualClock>, Trace) {
    let clock = Arc::new(ManualClock::new(start_ms));
    let trace = Trace::with_clock("prop", clock.clone());
    (clock, trace)
}

proptest! {
    #[test]
    fn stop_twice_matches_stop_once(start in 0i64..1_000_000, first in 0i64..2_000_000, second in 0i64..2_000_000) {
        let (_, once) = trace_at(start);
        once.start();
        once.stop_at(first);

        let (_, twice) = trace_at(start);
        twice.start();
        twice.stop_at(first);
        twice.stop_at(second);

        prop_assert_eq!(once.duration(), twice.duration());
        prop_assert_eq!(twice.end_timestamp(), first);
    }

    #[test]
    fn start_keeps_first_timestamp(start in 0i64..1_000_000, later in 1i64..1_000_000) {
        let (clock, trace) = trace_at(start);
        trace.start();
        clock.advance(later);
        trace.start();

        prop_assert_eq!(trace.start_timestamp(), start);
    }

    #[test]
    fn completed_trace_ignores_stop(end in -1_000_000i64..1_000_000, other in -1_000_000i64..1_000_000) {
        let trace = Trace::completed("FPT", end);
        prop_assert!(trace.is_stopped());

        trace.stop_at(other);
        prop_assert_eq!(trace.duration(), end);
    }
}

#[test]
fn concurrent_stoppers_retain_exactly_one_timestamp() {
    const CALLERS: usize = 16;

    for _ in 0..50 {
        let (_, trace) = trace_at(0);
        let trace = Arc::new(trace);
        trace.start();

        let barrier = Arc::new(Barrier::new(CALLERS));
        let winners = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..CALLERS)
            .map(|i| {
                let trace = Arc::clone(&trace);
                let barrier = Arc::clone(&barrier);
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    barrier.wait();
                    let ts = 1_000 + i as i64;
                    if trace.stop_at(ts) {
                        winners.fetch_add(1, Ordering::SeqCst);
                        Some(ts)
                    } else {
                        None
                    }
                })
            })
            .collect();

        let won: Vec<i64> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(won.len(), 1);
        assert!(trace.is_stopped());
        assert_eq!(trace.end_timestamp(), won[0]);

        let first_read = trace.duration();
        for _ in 0..10 {
            assert_eq!(trace.duration(), first_read);
        }
    }
}

#[test]
fn concurrent_starters_write_once() {
    const CALLERS: usize = 8;

    let clock = Arc::new(ManualClock::new(100));
    let trace = Arc::new(Trace::with_clock("RenderTrace", clock.clone()));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let started: usize = (0..CALLERS)
        .map(|_| {
            let trace = Arc::clone(&trace);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                trace.start()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap() as usize)
        .sum();

    assert_eq!(started, 1);
    assert_eq!(trace.start_timestamp(), 100);
}

#[test]
fn stopped_reader_sees_final_end() {
    let (_, trace) = trace_at(0);
    let trace = Arc::new(trace);
    trace.start();

    let writer = {
        let trace = Arc::clone(&trace);
        thread::spawn(move || trace.stop_at(777))
    };

    loop {
        if trace.is_stopped() {
            assert_eq!(trace.end_timestamp(), 777);
            break;
        }
        thread::yield_now();
    }
    assert!(writer.join().unwrap());
}

#[test]
fn default_clock_elapsed_never_decreases() {
    let trace = Trace::new("FCP");
    assert!(trace.start());

    let mut previous = trace.elapsed_since_start();
    assert!(previous >= 0);
    for i in 0..500 {
        if i % 100 == 0 {
            thread::sleep(Duration::from_millis(2));
        }
        let elapsed = trace.elapsed_since_start();
        assert!(elapsed >= previous, "elapsed went back from {previous} to {elapsed}");
        previous = elapsed;
    }
    assert!(previous >= 8);

    assert!(trace.stop());
    assert!(trace.duration() >= previous);
}

#[test]
fn fcp_fpt_and_page_scenarios() {
    let clock = Arc::new(ManualClock::new(100));
    let fcp = Trace::with_clock("FCP", clock.clone());
    fcp.start();
    clock.set(250);
    fcp.stop();
    assert_eq!(fcp.duration(), 150);

    let fpt = Trace::completed("FPT", 500);
    assert!(fpt.is_stopped());
    assert_eq!(fpt.duration(), 500);

    let page = Trace::with_clock("RenderTrace", Arc::new(ManualClock::new(0)));
    page.start();
    page.stop_at(300);
    page.stop_at(400);
    assert_eq!(page.duration(), 300);
    assert_eq!(page.duration(), 300);
}
