// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Atomic primitive layer: read/modify/write and barrier operations over
// 8/16/32/64-bit words. One module per width, generated from a single
// macro template so the per-width arithmetic stays concrete rather than
// routed through a generic trait.

#[cfg(not(loom))]
use std::sync::atomic::Ordering;
#[cfg(loom)]
use loom::sync::atomic::Ordering;

// The lock word types (AtomicU32/AtomicU64 — the only widths the
// progressive lock itself instantiates) are re-exported here so that
// `lock.rs` and `waiters.rs` go through a single swap point: under
// `cfg(loom)`, model-checked tests substitute loom's tracked atomics for
// std's real ones, without the lock or wait-helper code needing to know
// which one it's holding. The 8/16-bit widths below are plain primitive
// surface, never instantiated by the lock itself, so they stay on std's
// real atomics unconditionally — loom has no reason to track them.
#[cfg(not(loom))]
pub use std::sync::atomic::{AtomicU32, AtomicU64};
#[cfg(loom)]
pub use loom::sync::atomic::{AtomicU32, AtomicU64};

/// Single cooperative spin hint. No memory ordering effect.
#[inline(always)]
pub fn cpu_relax() {
    std::hint::spin_loop();
}

/// Compiler-only barrier: prevents the compiler from reordering memory
/// accesses across this point, without emitting a hardware fence.
#[cfg(not(loom))]
#[inline(always)]
pub fn barrier() {
    std::sync::atomic::compiler_fence(Ordering::SeqCst);
}

/// Under loom, the model's own fences replace a bare compiler fence;
/// loom treats `fence(SeqCst)` as significant to its interleaving search
/// in a way `compiler_fence` is not; a compiler-only barrier has no
/// model-checked counterpart, so it's a no-op here.
#[cfg(loom)]
#[inline(always)]
pub fn barrier() {}

/// Full (bidirectional) memory fence.
#[inline(always)]
pub fn mb() {
    #[cfg(not(loom))]
    std::sync::atomic::fence(Ordering::SeqCst);
    #[cfg(loom)]
    loom::sync::atomic::fence(Ordering::SeqCst);
}

/// One-sided fence ordering subsequent loads after prior loads/stores.
#[inline(always)]
pub fn mb_load() {
    #[cfg(not(loom))]
    std::sync::atomic::fence(Ordering::Acquire);
    #[cfg(loom)]
    loom::sync::atomic::fence(Ordering::Acquire);
}

/// One-sided fence ordering prior stores before subsequent loads/stores.
#[inline(always)]
pub fn mb_store() {
    #[cfg(not(loom))]
    std::sync::atomic::fence(Ordering::Release);
    #[cfg(loom)]
    loom::sync::atomic::fence(Ordering::Release);
}

macro_rules! define_atomic_ops {
    ($mod_name:ident, $word:ty, $atomic:ty) => {
        /// Atomic primitives over a
        #[doc = stringify!($word)]
        /// word.
        pub mod $mod_name {
            use super::*;

            /// Acquire-ordered load.
            #[inline]
            pub fn load(p: &$atomic) -> $word {
                p.load(Ordering::Acquire)
            }

            /// Release-ordered store.
            #[inline]
            pub fn store(p: &$atomic, v: $word) {
                p.store(v, Ordering::Release)
            }

            /// Returns the value *before* the add.
            #[inline]
            pub fn fetch_add(p: &$atomic, x: $word) -> $word {
                p.fetch_add(x, Ordering::SeqCst)
            }

            /// Returns the value *before* the subtract.
            #[inline]
            pub fn fetch_sub(p: &$atomic, x: $word) -> $word {
                p.fetch_sub(x, Ordering::SeqCst)
            }

            /// Returns the value *before* the or.
            #[inline]
            pub fn fetch_or(p: &$atomic, x: $word) -> $word {
                p.fetch_or(x, Ordering::SeqCst)
            }

            /// Returns the value *before* the and.
            #[inline]
            pub fn fetch_and(p: &$atomic, x: $word) -> $word {
                p.fetch_and(x, Ordering::SeqCst)
            }

            /// Returns the value *before* the xor.
            #[inline]
            pub fn fetch_xor(p: &$atomic, x: $word) -> $word {
                p.fetch_xor(x, Ordering::SeqCst)
            }

            /// Add without returning the prior value.
            #[inline]
            pub fn add(p: &$atomic, x: $word) {
                p.fetch_add(x, Ordering::SeqCst);
            }

            /// Subtract without returning the prior value.
            #[inline]
            pub fn sub(p: &$atomic, x: $word) {
                p.fetch_sub(x, Ordering::SeqCst);
            }

            /// Or without returning the prior value.
            #[inline]
            pub fn or(p: &$atomic, x: $word) {
                p.fetch_or(x, Ordering::SeqCst);
            }

            /// And without returning the prior value.
            #[inline]
            pub fn and(p: &$atomic, x: $word) {
                p.fetch_and(x, Ordering::SeqCst);
            }

            /// Xor without returning the prior value.
            #[inline]
            pub fn xor(p: &$atomic, x: $word) {
                p.fetch_xor(x, Ordering::SeqCst);
            }

            /// Increment by one, returning whether the result is nonzero.
            #[inline]
            pub fn inc(p: &$atomic) -> bool {
                p.fetch_add(1, Ordering::SeqCst).wrapping_add(1) != 0
            }

            /// Decrement by one, returning whether the result is nonzero.
            #[inline]
            pub fn dec(p: &$atomic) -> bool {
                p.fetch_sub(1, Ordering::SeqCst).wrapping_sub(1) != 0
            }

            /// Increment by one, discarding the result.
            #[inline]
            pub fn inc_noret(p: &$atomic) {
                p.fetch_add(1, Ordering::SeqCst);
            }

            /// Decrement by one, discarding the result.
            #[inline]
            pub fn dec_noret(p: &$atomic) {
                p.fetch_sub(1, Ordering::SeqCst);
            }

            /// Compare-and-swap, returning the prior value regardless of
            /// whether the swap took place (caller compares against `old`
            /// to determine success).
            #[inline]
            pub fn cmpxchg(p: &$atomic, old: $word, new: $word) -> $word {
                match p.compare_exchange(old, new, Ordering::SeqCst, Ordering::SeqCst) {
                    Ok(prev) => prev,
                    Err(prev) => prev,
                }
            }

            /// Unconditional exchange, returning the prior value.
            #[inline]
            pub fn xchg(p: &$atomic, x: $word) -> $word {
                p.swap(x, Ordering::SeqCst)
            }

            /// Atomically set bit `n`, returning the prior value of that
            /// bit as `0` or all-ones (matching the C primitive's
            /// "boolean spread across the word" convention).
            #[inline]
            pub fn bts(p: &$atomic, n: u32) -> $word {
                let mask: $word = 1 << n;
                let prev = p.fetch_or(mask, Ordering::SeqCst);
                if prev & mask != 0 {
                    <$word>::MAX
                } else {
                    0
                }
            }

            /// Atomically clear bit `n`, same return convention as [`bts`].
            #[inline]
            pub fn btr(p: &$atomic, n: u32) -> $word {
                let mask: $word = 1 << n;
                let prev = p.fetch_and(!mask, Ordering::SeqCst);
                if prev & mask != 0 {
                    <$word>::MAX
                } else {
                    0
                }
            }
        }
    };
}

define_atomic_ops!(w8, u8, std::sync::atomic::AtomicU8);
define_atomic_ops!(w16, u16, std::sync::atomic::AtomicU16);
define_atomic_ops!(w32, u32, AtomicU32);
define_atomic_ops!(w64, u64, AtomicU64);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn fetch_add_returns_prior() {
        let a = AtomicU32::new(5);
        assert_eq!(w32::fetch_add(&a, 3), 5);
        assert_eq!(w32::load(&a), 8);
    }

    #[test]
    fn bts_btr_round_trip() {
        let a = AtomicU32::new(0);
        assert_eq!(w32::bts(&a, 3), 0);
        assert_eq!(w32::load(&a), 0b1000);
        assert_eq!(w32::bts(&a, 3), u32::MAX);
        assert_eq!(w32::btr(&a, 3), u32::MAX);
        assert_eq!(w32::load(&a), 0);
        assert_eq!(w32::btr(&a, 3), 0);
    }

    #[test]
    fn cmpxchg_reports_prior_on_mismatch() {
        let a = AtomicU32::new(10);
        assert_eq!(w32::cmpxchg(&a, 99, 1), 10);
        assert_eq!(w32::load(&a), 10);
        assert_eq!(w32::cmpxchg(&a, 10, 1), 10);
        assert_eq!(w32::load(&a), 1);
    }

    #[test]
    fn inc_dec_report_nonzero() {
        let a = AtomicU32::new(0);
        assert!(w32::inc(&a));
        assert!(w32::dec(&a) == false);
    }
}
