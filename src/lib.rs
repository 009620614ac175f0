// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// A progressive lock packs five coexisting states — unlocked, read, seek,
// write, atomic — into a single machine word, so that a thread walking a
// tree-like structure can hold a cheap, shareable "I might write here"
// claim (seek) for the entire descent and only pay for true exclusion
// (write) or lock-free fan-out (atomic) at the last moment. An optional
// join/claim extension lets many readers agree, without a leader election,
// on which of them gets to perform a parallel write step.
//
// This crate provides the lock word itself (`PLock32`, `PLock64`), the
// atomic primitives and backoff schedules it's built from (exposed for
// callers protecting their own words with the same discipline), and a thin
// typestate guard layer for ergonomic, misuse-resistant acquisition.

pub mod primitive;

mod backoff;
pub mod waiters;

mod lock;
pub use lock::{LockState, PLock32, PLock64};

pub mod guard;
