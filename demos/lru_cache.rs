// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Toy sharded hash-cache demo: N threads over a shared keyed cache do
// `take_r; lookup; drop_r` on the hot path, and on a miss fall back to
// `take_s; re-lookup; stow; insert; drop_w`. Not a real LRU (no recency
// tracking) — just enough structure to drive the lock through its
// read/seek/write pattern under real contention.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use plock::PLock32;

const SHARD_COUNT: usize = 8;
const CAPACITY_PER_SHARD: usize = 64;
const KEY_SPACE: u64 = 2_000;

struct Shard {
    lock: PLock32,
    entries: std::cell::UnsafeCell<Vec<(u64, u64)>>,
}

unsafe impl Sync for Shard {}

impl Shard {
    fn new() -> Self {
        Self {
            lock: PLock32::new(),
            entries: std::cell::UnsafeCell::new(Vec::with_capacity(CAPACITY_PER_SHARD)),
        }
    }

    /// Read-side lookup. Returns the cached value, if present.
    fn lookup(&self, key: u64) -> Option<u64> {
        self.lock.take_r();
        // Safe: only read under R, and no writer can hold W concurrently.
        let entries = unsafe { &*self.entries.get() };
        let found = entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
        self.lock.drop_r();
        found
    }

    /// Miss path: seek, re-check (another thread may have inserted while
    /// we were walking), upgrade to write, insert if still missing.
    fn insert_on_miss(&self, key: u64, value: u64) {
        self.lock.take_s();
        let already_present = {
            let entries = unsafe { &*self.entries.get() };
            entries.iter().any(|(k, _)| *k == key)
        };
        if already_present {
            self.lock.stor();
            self.lock.drop_r();
            return;
        }
        self.lock.stow();
        // Safe: exclusive under W.
        let entries = unsafe { &mut *self.entries.get() };
        if entries.len() >= CAPACITY_PER_SHARD {
            entries.remove(0); // evict oldest; no recency tracking here
        }
        entries.push((key, value));
        self.lock.drop_w();
    }

    fn len(&self) -> usize {
        self.lock.take_r();
        let n = unsafe { &*self.entries.get() }.len();
        self.lock.drop_r();
        n
    }

    fn integrity_check(&self) -> bool {
        self.lock.take_r();
        let entries = unsafe { &*self.entries.get() };
        let mut seen = std::collections::HashSet::new();
        let mut ok = entries.len() <= CAPACITY_PER_SHARD;
        for (k, _) in entries.iter() {
            ok &= seen.insert(*k); // false if a key appears twice
        }
        self.lock.drop_r();
        ok
    }
}

struct Cache {
    shards: Vec<Shard>,
}

impl Cache {
    fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Shard::new()).collect(),
        }
    }

    fn shard_for(&self, key: u64) -> &Shard {
        &self.shards[(key % SHARD_COUNT as u64) as usize]
    }

    fn get_or_insert(&self, key: u64) {
        if let Some(_v) = self.shard_for(key).lookup(key) {
            return;
        }
        self.shard_for(key).insert_on_miss(key, key * 2);
    }
}

fn main() {
    let threads: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    let run_for = Duration::from_secs(
        std::env::args()
            .nth(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(2),
    );

    let cache = Arc::new(Cache::new());
    let ops = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let handles: Vec<_> = (0..threads)
        .map(|seed| {
            let cache = Arc::clone(&cache);
            let ops = Arc::clone(&ops);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut rng_state = 0x9E3779B97F4A7C15u64 ^ (seed as u64).wrapping_mul(0x2545F4914F6CDD1D);
                let mut local_ops = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    // xorshift64* for a cheap, dependency-free PRNG.
                    rng_state ^= rng_state << 13;
                    rng_state ^= rng_state >> 7;
                    rng_state ^= rng_state << 17;
                    let key = rng_state % KEY_SPACE;
                    cache.get_or_insert(key);
                    local_ops += 1;
                }
                ops.fetch_add(local_ops, Ordering::Relaxed);
            })
        })
        .collect();

    let start = Instant::now();
    thread::sleep(run_for);
    stop.store(true, Ordering::Relaxed);
    for h in handles {
        h.join().unwrap();
    }
    let elapsed = start.elapsed();

    let total_ops = ops.load(Ordering::Relaxed);
    let total_entries: usize = cache.shards.iter().map(|s| s.len()).sum();
    let all_consistent = cache.shards.iter().all(|s| s.integrity_check());

    println!("threads:          {threads}");
    println!("total ops:        {total_ops}");
    println!("elapsed:          {elapsed:?}");
    println!("ops/s:            {:.0}", total_ops as f64 / elapsed.as_secs_f64());
    println!("final cache size: {total_entries} (bound: {})", SHARD_COUNT * CAPACITY_PER_SHARD);
    println!("integrity check:  {}", if all_consistent { "PASS" } else { "FAIL" });

    assert!(total_entries <= SHARD_COUNT * CAPACITY_PER_SHARD);
    assert!(all_consistent, "cache integrity check failed");
}
