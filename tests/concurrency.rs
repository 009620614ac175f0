// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Multi-threaded scenarios from the testable-properties section: two
// readers + one writer, the rwrace regression (1 reader / 7 writers), and
// atomic fan-in. Style follows test_rw_lock.rs / test_spin_lock.rs:
// Arc-shared state, AtomicBool/AtomicI32 violation flags, thread::spawn
// fan-out, a final assert.

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use plock::PLock32;

// I1 / scenario 2: two readers, one writer. The writer must never observe
// a reader mid-critical-section, and readers must never observe torn
// writes.
#[test]
fn two_readers_one_writer_no_torn_writes() {
    let lock = Arc::new(PLock32::new());
    let data = Arc::new(AtomicI32::new(0));
    let iterations = 300;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let lock = Arc::clone(&lock);
        let data = Arc::clone(&data);
        handles.push(thread::spawn(move || {
            for _ in 0..iterations {
                lock.take_r();
                let v = data.load(Ordering::Relaxed);
                assert!(v >= 0);
                lock.drop_r();
                thread::yield_now();
            }
        }));
    }

    let lock_w = Arc::clone(&lock);
    let data_w = Arc::clone(&data);
    handles.push(thread::spawn(move || {
        for _ in 0..iterations {
            lock_w.take_w();
            data_w.fetch_add(1, Ordering::Relaxed);
            lock_w.drop_w();
            thread::yield_now();
        }
    }));

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(data.load(Ordering::Relaxed), iterations);
    assert_eq!(lock.bits(), 0);
}

// I1: mutual exclusion of W, observed via a "currently in critical
// section" flag instead of just a counter.
#[test]
fn writer_exclusive_access() {
    let lock = Arc::new(PLock32::new());
    let writer_in_cs = Arc::new(AtomicUsize::new(0));
    let violation = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = Arc::clone(&lock);
            let wics = Arc::clone(&writer_in_cs);
            let viol = Arc::clone(&violation);
            thread::spawn(move || {
                for _ in 0..100 {
                    lock.take_w();
                    if wics.fetch_add(1, Ordering::SeqCst) != 0 {
                        viol.store(true, Ordering::SeqCst);
                    }
                    thread::yield_now();
                    wics.fetch_sub(1, Ordering::SeqCst);
                    lock.drop_w();
                    thread::yield_now();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert!(!violation.load(Ordering::SeqCst));
}

// I2 / scenario 6: the rwrace regression. 1 reader, 7 writers; the reader
// must never observe `check != 0` while inside its R critical section.
#[test]
fn rwrace_one_reader_seven_writers() {
    let lock = Arc::new(PLock32::new());
    let check = Arc::new(AtomicI32::new(0));
    let violation = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let reader_progress = Arc::new(AtomicUsize::new(0));
    let writer_progress = Arc::new(AtomicUsize::new(0));

    let rounds = 2000;

    let mut handles = Vec::new();

    {
        let lock = Arc::clone(&lock);
        let check = Arc::clone(&check);
        let violation = Arc::clone(&violation);
        let progress = Arc::clone(&reader_progress);
        handles.push(thread::spawn(move || {
            for _ in 0..rounds {
                lock.take_r();
                for _ in 0..8 {
                    if check.load(Ordering::SeqCst) != 0 {
                        violation.store(true, Ordering::SeqCst);
                    }
                }
                lock.drop_r();
                progress.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for _ in 0..7 {
        let lock = Arc::clone(&lock);
        let check = Arc::clone(&check);
        let progress = Arc::clone(&writer_progress);
        handles.push(thread::spawn(move || {
            for _ in 0..rounds {
                lock.take_w();
                check.fetch_add(1, Ordering::SeqCst);
                check.fetch_sub(1, Ordering::SeqCst);
                lock.drop_w();
                progress.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    assert!(!violation.load(Ordering::SeqCst), "reader observed a write in progress");
    assert_eq!(reader_progress.load(Ordering::Relaxed), rounds);
    assert_eq!(writer_progress.load(Ordering::Relaxed), rounds * 7);
    assert_eq!(lock.bits(), 0);
}

// Scenario 5: atomic fan-in. 4 threads attempt R->A; every success
// increments a shared counter under its own atomic fetch-add, and the
// final total equals the number of successful conversions.
#[test]
fn atomic_fan_in() {
    let lock = Arc::new(PLock32::new());
    let counter = Arc::new(AtomicI32::new(0));
    let successes = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = Arc::clone(&lock);
            let counter = Arc::clone(&counter);
            let successes = Arc::clone(&successes);
            thread::spawn(move || {
                for _ in 0..200 {
                    lock.take_r();
                    if lock.try_rtoa() {
                        counter.fetch_add(1, Ordering::SeqCst);
                        successes.fetch_add(1, Ordering::Relaxed);
                        lock.drop_a();
                    } else {
                        lock.drop_r();
                    }
                    thread::yield_now();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(
        counter.load(Ordering::SeqCst) as usize,
        successes.load(Ordering::Relaxed)
    );
    assert_eq!(lock.bits(), 0);
}

// I3: at most one seeker at any instant.
#[test]
fn seeker_uniqueness() {
    let lock = Arc::new(PLock32::new());
    let seekers_in_cs = Arc::new(AtomicUsize::new(0));
    let violation = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let lock = Arc::clone(&lock);
            let sics = Arc::clone(&seekers_in_cs);
            let viol = Arc::clone(&violation);
            thread::spawn(move || {
                for _ in 0..150 {
                    lock.take_s();
                    if sics.fetch_add(1, Ordering::SeqCst) != 0 {
                        viol.store(true, Ordering::SeqCst);
                    }
                    thread::sleep(Duration::from_micros(1));
                    sics.fetch_sub(1, Ordering::SeqCst);
                    lock.drop_s();
                    thread::yield_now();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert!(!violation.load(Ordering::SeqCst));
    assert_eq!(lock.bits(), 0);
}

// I6: forward progress under finitely many contenders.
#[test]
fn blocking_take_eventually_returns_under_contention() {
    let lock = Arc::new(PLock32::new());
    let total_ops = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lock = Arc::clone(&lock);
            let total_ops = Arc::clone(&total_ops);
            thread::spawn(move || {
                for _ in 0..500 {
                    lock.take_w();
                    lock.drop_w();
                    total_ops.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(total_ops.load(Ordering::Relaxed), 8 * 500);
    assert_eq!(lock.bits(), 0);
}
