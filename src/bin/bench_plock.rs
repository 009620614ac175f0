// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Multithreaded throughput harness: N threads repeatedly acquire and
// release the lock in one of a few fixed patterns for a wall-clock period,
// reporting aggregate ops/s and per-thread ns/op. Pattern and thread count
// are the only configurable knobs; this is a microbenchmark, not a
// criterion suite (see benches/contention.rs for the latency comparison
// against std::sync::RwLock).

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use plock::PLock32;

#[derive(Clone, Copy)]
enum Pattern {
    ReadOnly,
    WriteOnly,
    SeekThenWrite,
    MixedReadWrite,
}

impl Pattern {
    fn parse(s: &str) -> Self {
        match s {
            "read" => Pattern::ReadOnly,
            "write" => Pattern::WriteOnly,
            "seek" => Pattern::SeekThenWrite,
            "mixed" => Pattern::MixedReadWrite,
            other => {
                eprintln!("unknown pattern {other:?}, defaulting to mixed");
                Pattern::MixedReadWrite
            }
        }
    }
}

struct Stats {
    total_ops: u64,
    elapsed: Duration,
    threads: usize,
}

impl Stats {
    fn report(&self) {
        let ops_per_sec = self.total_ops as f64 / self.elapsed.as_secs_f64();
        let ns_per_op = self.elapsed.as_nanos() as f64 * self.threads as f64
            / self.total_ops.max(1) as f64;
        println!("threads:        {}", self.threads);
        println!("total ops:      {}", self.total_ops);
        println!("elapsed:        {:?}", self.elapsed);
        println!("aggregate ops/s: {ops_per_sec:.0}");
        println!("ns/op (per thread): {ns_per_op:.1}");
    }
}

fn run(pattern: Pattern, threads: usize, duration: Duration) -> Stats {
    let lock = Arc::new(PLock32::new());
    let counter = Arc::new(AtomicU64::new(0));
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let op_counts: Vec<_> = (0..threads).map(|_| Arc::new(AtomicU64::new(0))).collect();

    let handles: Vec<_> = op_counts
        .iter()
        .map(|ops| {
            let lock = Arc::clone(&lock);
            let counter = Arc::clone(&counter);
            let stop = Arc::clone(&stop);
            let ops = Arc::clone(ops);
            thread::spawn(move || {
                let mut local = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    match pattern {
                        Pattern::ReadOnly => {
                            lock.take_r();
                            std::hint::black_box(counter.load(Ordering::Relaxed));
                            lock.drop_r();
                        }
                        Pattern::WriteOnly => {
                            lock.take_w();
                            counter.fetch_add(1, Ordering::Relaxed);
                            lock.drop_w();
                        }
                        Pattern::SeekThenWrite => {
                            lock.take_s();
                            std::hint::black_box(counter.load(Ordering::Relaxed));
                            lock.stow();
                            counter.fetch_add(1, Ordering::Relaxed);
                            lock.drop_w();
                        }
                        Pattern::MixedReadWrite => {
                            if local % 8 == 0 {
                                lock.take_w();
                                counter.fetch_add(1, Ordering::Relaxed);
                                lock.drop_w();
                            } else {
                                lock.take_r();
                                std::hint::black_box(counter.load(Ordering::Relaxed));
                                lock.drop_r();
                            }
                        }
                    }
                    local += 1;
                }
                ops.store(local, Ordering::Relaxed);
            })
        })
        .collect();

    let start = Instant::now();
    thread::sleep(duration);
    stop.store(true, Ordering::Relaxed);
    for h in handles {
        h.join().unwrap();
    }
    let elapsed = start.elapsed();

    let total_ops = op_counts.iter().map(|c| c.load(Ordering::Relaxed)).sum();
    Stats {
        total_ops,
        elapsed,
        threads,
    }
}

fn main() {
    let mut args = env::args().skip(1);
    let pattern = Pattern::parse(&args.next().unwrap_or_else(|| "mixed".to_string()));
    let threads: usize = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| thread::available_parallelism().map(|n| n.get()).unwrap_or(4));
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2);

    let stats = run(pattern, threads, Duration::from_secs(seconds));
    stats.report();
}
