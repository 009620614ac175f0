// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Backoff-driven wait helpers for the lock word: spin/backoff loops that
// wait for a bit pattern to clear, or for a word to change from a known
// value. These are
// read-only with respect to the lock word — they never mutate it — and are
// exposed publicly so callers protecting their own atomic words with the
// same discipline don't have to re-derive the tuned constants.

// Re-exported from `crate::primitive` (std atomics normally, loom's
// tracked atomics under `--cfg loom`) rather than imported from
// `std::sync::atomic` directly, so these helpers stay usable against the
// same word the lock itself holds under a loom model-check build.
use crate::primitive::{AtomicU32, AtomicU64};

use crate::backoff::{Backoff, NewBackoff};

/// Block until `(lock.load() & mask) == 0`, returning the observed value.
pub fn wait_unlock_u32(lock: &AtomicU32, mask: u32) -> u32 {
    let mut backoff = Backoff::new();
    loop {
        backoff.spin();
        let v = crate::primitive::w32::load(lock);
        if v & mask == 0 {
            return v;
        }
        backoff.advance();
    }
}

/// 64-bit counterpart of [`wait_unlock_u32`].
pub fn wait_unlock_u64(lock: &AtomicU64, mask: u64) -> u64 {
    let mut backoff = Backoff::new();
    loop {
        backoff.spin();
        let v = crate::primitive::w64::load(lock);
        if v & mask == 0 {
            return v;
        }
        backoff.advance();
    }
}

/// Block until `lock.load() != prev`, returning the observed value.
pub fn wait_new_u32(lock: &AtomicU32, prev: u32) -> u32 {
    let mut backoff = NewBackoff::new();
    loop {
        backoff.spin();
        let v = crate::primitive::w32::load(lock);
        if v != prev {
            return v;
        }
        backoff.advance();
    }
}

/// 64-bit counterpart of [`wait_new_u32`].
pub fn wait_new_u64(lock: &AtomicU64, prev: u64) -> u64 {
    let mut backoff = NewBackoff::new();
    loop {
        backoff.spin();
        let v = crate::primitive::w64::load(lock);
        if v != prev {
            return v;
        }
        backoff.advance();
    }
}

/// Generalization used internally by the lock: block until `predicate`
/// holds for the reloaded word, using the same schedule as
/// [`wait_unlock_u32`]/[`wait_unlock_u64`] rather than the fixed
/// "mask is clear" condition.
pub(crate) fn wait_until_u32(lock: &AtomicU32, mut predicate: impl FnMut(u32) -> bool) -> u32 {
    let mut backoff = Backoff::new();
    loop {
        backoff.spin();
        let v = crate::primitive::w32::load(lock);
        if predicate(v) {
            return v;
        }
        backoff.advance();
    }
}

/// 64-bit counterpart of [`wait_until_u32`].
pub(crate) fn wait_until_u64(lock: &AtomicU64, mut predicate: impl FnMut(u64) -> bool) -> u64 {
    let mut backoff = Backoff::new();
    loop {
        backoff.spin();
        let v = crate::primitive::w64::load(lock);
        if predicate(v) {
            return v;
        }
        backoff.advance();
    }
}
