// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// The progressive lock itself: a single machine word encoding up to five
// coexisting states (U/R/S/W/A) plus the extended J/C multi-writer
// pipeline. The bit layout and transition algorithms are described in the
// module-level docs below, alongside each operation's delta, abort
// condition, and wait-after-claim behavior.
//
// Two concrete widths are instantiated from one template below rather than
// expressed as a single generic type: every field-width computation
// (shifts, masks, combined deltas) stays a plain integer constant of the
// concrete word type, so each instantiation reads like ordinary arithmetic
// rather than through an associated-type indirection.

/// Decoded, human-readable view of a lock word, returned by `PLock*::state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No holder.
    Unlocked,
    /// `n` concurrent readers, no seeker.
    Read(u32),
    /// A seeker holds the lock; `n` total readers (including the seeker).
    Seek(u32),
    /// The exclusive writer holds the lock (no readers remain).
    Write,
    /// `n` concurrent atomic writers.
    Atomic(u32),
    /// `n` readers mid-join toward the claim rendezvous.
    Join(u32),
    /// The claim point has been reached; `n` readers are staking writes.
    Claim(u32),
}

macro_rules! define_plock {
    (
        $(#[$meta:meta])*
        mod_name = $mod_name:ident,
        struct_name = $struct_name:ident,
        word = $word:ty,
        atomic = $atomic:ty,
        primitive = $prim:ident,
        wait_unlock = $wait_unlock:ident,
        wait_new = $wait_new:ident,
        wait_until = $wait_until:ident,
        reader_bits = $reader_bits:expr,
        seeker_bits = $seeker_bits:expr,
        writer_bits = $writer_bits:expr,
    ) => {
        $(#[$meta])*
        pub mod $mod_name {
            // Goes through `crate::primitive`'s re-export rather than
            // `std::sync::atomic` directly so that building with
            // `--cfg loom` transparently swaps in loom's tracked atomic
            // in place of the real one; see primitive.rs.
            use crate::primitive::$atomic;

            use crate::primitive::$prim;
            use crate::waiters::{$wait_unlock, $wait_new, $wait_until};
            use crate::LockState;

            const RESERVED_BITS: u32 = 2;
            pub const READER_BITS: u32 = $reader_bits;
            pub const SEEKER_BITS: u32 = $seeker_bits;
            pub const WRITER_BITS: u32 = $writer_bits;

            const READER_SHIFT: u32 = RESERVED_BITS;
            const SEEKER_SHIFT: u32 = READER_SHIFT + READER_BITS;
            const WRITER_SHIFT: u32 = SEEKER_SHIFT + SEEKER_BITS;

            /// One reader unit.
            pub const RL: $word = 1 << READER_SHIFT;
            /// One seeker unit.
            pub const SL: $word = 1 << SEEKER_SHIFT;
            /// One writer unit.
            pub const WL: $word = 1 << WRITER_SHIFT;

            /// Full mask of the reader field.
            pub const RL_ANY: $word = (((1 as $word) << READER_BITS) - 1) << READER_SHIFT;
            /// Full mask of the seeker field.
            pub const SL_ANY: $word = (((1 as $word) << SEEKER_BITS) - 1) << SEEKER_SHIFT;
            /// Full mask of the writer field.
            pub const WL_ANY: $word = (((1 as $word) << WRITER_BITS) - 1) << WRITER_SHIFT;

            /// Largest writer-field count representable, i.e. the overflow
            /// ceiling referenced by invariant I7.
            pub const MAX_WRITERS: $word = (((1 as $word) << WRITER_BITS) - 1);

            const TAKE_S_DELTA: $word = SL | RL;
            const TAKE_W_DELTA: $word = WL | SL | RL;
            const WL_MINUS_RL: $word = WL.wrapping_sub(RL);
            const RL_MINUS_WL: $word = RL.wrapping_sub(WL);

            #[inline]
            fn reader_count(v: $word) -> $word {
                (v & RL_ANY) >> READER_SHIFT
            }

            #[inline]
            fn seeker_count(v: $word) -> $word {
                (v & SL_ANY) >> SEEKER_SHIFT
            }

            #[inline]
            fn writer_count(v: $word) -> $word {
                (v & WL_ANY) >> WRITER_SHIFT
            }

            /// A progressive lock stored in a single
            #[doc = stringify!($word)]
            /// word.
            pub struct $struct_name {
                word: $atomic,
            }

            impl $struct_name {
                /// Create a new, unlocked progressive lock.
                pub const fn new() -> Self {
                    Self {
                        word: <$atomic>::new(0),
                    }
                }

                /// Raw observer: the current lock word, with no ordering
                /// guarantee beyond acquire (intended for diagnostics and
                /// tests, not for making acquisition decisions).
                pub fn bits(&self) -> $word {
                    $prim::load(&self.word)
                }

                /// Decoded observer; see [`bits`](Self::bits) for caveats.
                pub fn state(&self) -> LockState {
                    let v = self.bits();
                    let (r, s, w) = (reader_count(v), seeker_count(v), writer_count(v));
                    if w == 0 && s == 0 && r == 0 {
                        LockState::Unlocked
                    } else if w == 0 && s == 0 {
                        LockState::Read(r as u32)
                    } else if w == 0 && s != 0 {
                        LockState::Seek(r as u32)
                    } else if s == 0 {
                        // A solo exclusive writer (take_w/stow) always
                        // carries its own seeker+reader reservation
                        // (s == 1, r == 1) for as long as it's held, so
                        // s == 0 here can only mean an atomic writer (A
                        // never touches the seeker field), never Write.
                        LockState::Atomic(w as u32)
                    } else if w == 1 && r == 1 {
                        // Bit-identical to a lone J/C joiner reaching the
                        // claim rendezvous by itself; Write is reported
                        // for this degenerate single-occupant case since
                        // it's overwhelmingly the common path (take_w,
                        // or take_s+stow). Claim is reserved for the
                        // unambiguous r == w > 1 cohort case below.
                        LockState::Write
                    } else if r == w {
                        LockState::Claim(r as u32)
                    } else {
                        LockState::Join(r as u32)
                    }
                }

                // ------------------------------------------------------
                // Elementary take / try / drop
                // ------------------------------------------------------

                /// Non-blocking attempt to become a reader.
                pub fn try_r(&self) -> bool {
                    let prev = $prim::fetch_add(&self.word, RL);
                    if prev & WL_ANY != 0 {
                        $prim::sub(&self.word, RL);
                        return false;
                    }
                    true
                }

                /// Become a reader, blocking while a writer holds the lock.
                pub fn take_r(&self) {
                    loop {
                        if self.try_r() {
                            return;
                        }
                        $wait_unlock(&self.word, WL_ANY);
                    }
                }

                /// Release a reader claim.
                pub fn drop_r(&self) {
                    $prim::sub(&self.word, RL);
                }

                /// Non-blocking attempt to become the seeker.
                pub fn try_s(&self) -> bool {
                    let prev = $prim::fetch_add(&self.word, TAKE_S_DELTA);
                    if prev & (WL_ANY | SL_ANY) != 0 {
                        $prim::sub(&self.word, TAKE_S_DELTA);
                        return false;
                    }
                    true
                }

                /// Become the seeker, blocking while a writer or another
                /// seeker holds the lock.
                pub fn take_s(&self) {
                    loop {
                        if self.try_s() {
                            return;
                        }
                        $wait_unlock(&self.word, WL_ANY | SL_ANY);
                    }
                }

                /// Release a seeker claim (and its associated reader unit).
                pub fn drop_s(&self) {
                    $prim::sub(&self.word, TAKE_S_DELTA);
                }

                /// Attempt to become the exclusive writer: does not retry
                /// on a writer/seeker conflict (returns failure instead),
                /// but — like [`take_w`](Self::take_w) — still waits for
                /// any other readers to drain once the claim is granted,
                /// so a `true` return is always immediately usable.
                pub fn try_w(&self) -> bool {
                    let prev = $prim::fetch_add(&self.word, TAKE_W_DELTA);
                    if prev & (WL_ANY | SL_ANY) != 0 {
                        $prim::sub(&self.word, TAKE_W_DELTA);
                        return false;
                    }
                    $wait_until(&self.word, |v| reader_count(v) == 1);
                    true
                }

                /// Become the exclusive writer, blocking on conflicting
                /// writers/seekers, then waiting for readers to drain.
                pub fn take_w(&self) {
                    loop {
                        if self.try_w() {
                            return;
                        }
                        $wait_unlock(&self.word, WL_ANY | SL_ANY);
                    }
                }

                /// Release an exclusive writer claim.
                pub fn drop_w(&self) {
                    $prim::sub(&self.word, TAKE_W_DELTA);
                }

                /// Attempt to become an atomic writer: does not retry on a
                /// seeker conflict (returns failure instead), but — like
                /// [`take_a`](Self::take_a) — still waits (without
                /// releasing its claim) for existing readers to drain
                /// once granted.
                pub fn try_a(&self) -> bool {
                    let prev = $prim::fetch_add(&self.word, WL);
                    if prev & SL_ANY != 0 {
                        $prim::sub(&self.word, WL);
                        return false;
                    }
                    $wait_until(&self.word, |v| v & RL_ANY == 0);
                    true
                }

                /// Become an atomic writer. Coexists with other atomic
                /// writers; blocks on a seeker, and waits (without
                /// releasing its claim) for existing readers to drain.
                pub fn take_a(&self) {
                    loop {
                        if self.try_a() {
                            return;
                        }
                        $wait_unlock(&self.word, SL_ANY);
                    }
                }

                /// Release an atomic writer claim.
                pub fn drop_a(&self) {
                    $prim::sub(&self.word, WL);
                }

                // ------------------------------------------------------
                // Upgrade / downgrade
                // ------------------------------------------------------

                /// Seek → Write: take the write bit while already holding
                /// the seeker claim (which guarantees no other writer can
                /// be contending), then wait for other readers to drain.
                pub fn stow(&self) {
                    $prim::add(&self.word, WL);
                    $wait_until(&self.word, |v| reader_count(v) == 1);
                }

                /// Write → Seek: release the write bit, keep the seeker
                /// claim.
                pub fn wtos(&self) {
                    $prim::sub(&self.word, WL);
                }

                /// Seek → Read: drop the seeker bit, keep the reader unit.
                pub fn stor(&self) {
                    $prim::sub(&self.word, SL);
                }

                /// Write → Read: drop both writer and seeker bits, keep
                /// the reader unit.
                pub fn wtor(&self) {
                    $prim::sub(&self.word, WL | SL);
                }

                /// Read → Seek: attempt to become the seeker while already
                /// holding a reader unit. On failure, the caller's reader
                /// claim is **not** released automatically; the caller
                /// must drop it before retrying, or the retry can deadlock
                /// against a writer waiting for readers to drain.
                pub fn try_rtos(&self) -> bool {
                    let prev = $prim::fetch_add(&self.word, SL);
                    if prev & (WL_ANY | SL_ANY) != 0 {
                        $prim::sub(&self.word, SL);
                        return false;
                    }
                    true
                }

                /// Read → Write: attempt a direct upgrade. Same
                /// failure-leaves-R-held contract as
                /// [`try_rtos`](Self::try_rtos).
                pub fn try_rtow(&self) -> bool {
                    let prev = $prim::fetch_add(&self.word, WL | SL);
                    if prev & (WL_ANY | SL_ANY) != 0 {
                        $prim::sub(&self.word, WL | SL);
                        return false;
                    }
                    $wait_until(&self.word, |v| reader_count(v) == 1);
                    true
                }

                /// Read → Atomic: attempt to convert a reader claim into
                /// an atomic-writer claim. Same failure-leaves-R-held
                /// contract as [`try_rtos`](Self::try_rtos).
                pub fn try_rtoa(&self) -> bool {
                    let prev = $prim::fetch_add(&self.word, WL_MINUS_RL);
                    if prev & SL_ANY != 0 {
                        $prim::sub(&self.word, WL_MINUS_RL);
                        return false;
                    }
                    $wait_until(&self.word, |v| v & RL_ANY == 0);
                    true
                }

                /// Atomic → Read: downgrade, then wait for any other
                /// atomic writers to fully drain.
                pub fn ator(&self) {
                    $prim::add(&self.word, RL_MINUS_WL);
                    $wait_until(&self.word, |v| v & WL_ANY == 0);
                }

                // ------------------------------------------------------
                // Extended multi-writer pipeline (R -> J -> C -> A)
                // ------------------------------------------------------

                /// Atomic → Join: fold an atomic-writer claim into the
                /// join pipeline. Cannot fail: the writer field is reused
                /// as a plain counter in this pipeline, so adding a
                /// reader unit alongside an existing writer unit is
                /// always consistent.
                pub fn atoj(&self) {
                    $prim::add(&self.word, RL);
                }

                /// Read → Join: stake a place in the multi-writer
                /// pipeline. Blocks until either another thread has
                /// already marked the claim point (S set) or every
                /// current reader has joined (`W == R`).
                pub fn rtoj(&self) {
                    $prim::add(&self.word, WL);
                    $wait_until(&self.word, |v| {
                        v & SL_ANY != 0 || writer_count(v) == reader_count(v)
                    });
                }

                /// Join → Claim: mark the claim point. Idempotent — safe
                /// to race, since setting an already-set bit is a no-op
                /// and the first setter's write is all that matters.
                pub fn jtoc(&self) {
                    let v = self.bits();
                    if v & SL_ANY == 0 {
                        $prim::or(&self.word, SL);
                    }
                }

                /// Read → Claim: compose [`rtoj`](Self::rtoj) and
                /// [`jtoc`](Self::jtoc) — the thread that observes
                /// `W == R` marks the claim point itself.
                pub fn rtoc(&self) {
                    $prim::add(&self.word, WL);
                    $wait_until(&self.word, |v| {
                        if v & SL_ANY != 0 {
                            return true;
                        }
                        if writer_count(v) == reader_count(v) {
                            $prim::or(&self.word, SL);
                            return true;
                        }
                        false
                    });
                }

                /// Claim → Unlocked: release this thread's reader and
                /// writer units; if no readers remain, also clear the
                /// claim bit.
                pub fn drop_c(&self) {
                    let prev = $prim::fetch_sub(&self.word, RL | WL);
                    let after = prev.wrapping_sub(RL | WL);
                    if reader_count(after) == 0 {
                        $prim::and(&self.word, !SL);
                    }
                }

                /// Claim → Atomic: give up the reader unit, then wait
                /// while the claim bit is set; the thread that observes
                /// no readers remaining clears it.
                pub fn ctoa(&self) {
                    $prim::sub(&self.word, RL);
                    $wait_until(&self.word, |v| {
                        if v & SL_ANY == 0 {
                            return true;
                        }
                        if reader_count(v) == 0 {
                            $prim::and(&self.word, !SL);
                            return true;
                        }
                        false
                    });
                }

                /// Non-blocking attempt to become the sole joiner from
                /// Unlocked.
                pub fn try_j(&self) -> bool {
                    let prev = $prim::load(&self.word);
                    if writer_count(prev) != 0 {
                        return false;
                    }
                    let prev = $prim::fetch_add(&self.word, WL | RL);
                    if writer_count(prev) != 0 {
                        $prim::sub(&self.word, WL | RL);
                        return false;
                    }
                    $wait_until(&self.word, |v| reader_count(v) == 1);
                    true
                }

                /// Become the sole joiner from Unlocked, retrying until no
                /// other writer is present, then waiting for any other
                /// readers to drain.
                pub fn take_j(&self) {
                    loop {
                        $wait_unlock(&self.word, WL_ANY);
                        let prev = $prim::fetch_add(&self.word, WL | RL);
                        if writer_count(prev) != 0 {
                            $prim::sub(&self.word, WL | RL);
                            continue;
                        }
                        break;
                    }
                    $wait_until(&self.word, |v| reader_count(v) == 1);
                }

                /// Join → Unlocked.
                pub fn drop_j(&self) {
                    $prim::sub(&self.word, WL | RL);
                }

                /// True iff this thread is the only writer in a J/C/A
                /// holder set (i.e. the writer field equals exactly one).
                pub fn last_writer(&self) -> bool {
                    writer_count(self.bits()) == 1
                }

                /// Block until the raw word differs from `prev`. Exposed
                /// for callers that need the generic "wait for any
                /// change" helper directly.
                pub fn wait_for_change(&self, prev: $word) -> $word {
                    $wait_new(&self.word, prev)
                }
            }

            impl Default for $struct_name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl std::fmt::Debug for $struct_name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(stringify!($struct_name))
                        .field("state", &self.state())
                        .field("bits", &self.bits())
                        .finish()
                }
            }

            unsafe impl Send for $struct_name {}
            unsafe impl Sync for $struct_name {}

        }
    };
}

define_plock!(
    /// 32-bit progressive lock: 14 reader bits, 2 seeker bits, 14 writer
    /// bits, 2 reserved bits.
    mod_name = w32lock,
    struct_name = PLock32,
    word = u32,
    atomic = AtomicU32,
    primitive = w32,
    wait_unlock = wait_unlock_u32,
    wait_new = wait_new_u32,
    wait_until = wait_until_u32,
    reader_bits = 14,
    seeker_bits = 2,
    writer_bits = 14,
);

define_plock!(
    /// 64-bit progressive lock: 30 reader bits, 2 seeker bits, 30 writer
    /// bits, 2 reserved bits.
    mod_name = w64lock,
    struct_name = PLock64,
    word = u64,
    atomic = AtomicU64,
    primitive = w64,
    wait_unlock = wait_unlock_u64,
    wait_new = wait_new_u64,
    wait_until = wait_until_u64,
    reader_bits = 30,
    seeker_bits = 2,
    writer_bits = 30,
);

pub use w32lock::PLock32;
pub use w64lock::PLock64;
