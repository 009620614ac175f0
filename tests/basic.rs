// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Single-thread sanity and upgrade-idempotence checks (scenario 1, I4, I8,
// I9) for both lock widths.

use plock::{LockState, PLock32, PLock64};

macro_rules! basic_tests {
    ($mod_name:ident, $lock:ty) => {
        mod $mod_name {
            use super::*;

            #[test]
            fn single_thread_write_sanity() {
                let lock = <$lock>::new();
                let mut counter = 0;

                lock.take_w();
                counter += 1;
                lock.drop_w();

                assert_eq!(counter, 1);
                assert_eq!(lock.bits(), 0, "word must return to U after a clean pair");
            }

            #[test]
            fn take_r_drop_r_restores_word() {
                let lock = <$lock>::new();
                lock.take_r();
                assert_eq!(lock.state(), LockState::Read(1));
                lock.drop_r();
                assert_eq!(lock.bits(), 0);
            }

            #[test]
            fn take_s_stow_wtos_drop_s_round_trip() {
                let lock = <$lock>::new();
                lock.take_s();
                lock.stow();
                assert_eq!(lock.state(), LockState::Write);
                lock.wtos();
                assert_eq!(lock.state(), LockState::Seek(1));
                lock.drop_s();
                assert_eq!(lock.bits(), 0);
            }

            #[test]
            fn take_w_wtor_drop_r_round_trip() {
                let lock = <$lock>::new();
                lock.take_w();
                lock.wtor();
                assert_eq!(lock.state(), LockState::Read(1));
                lock.drop_r();
                assert_eq!(lock.bits(), 0);
            }

            #[test]
            fn take_s_stor_drop_r_round_trip() {
                let lock = <$lock>::new();
                lock.take_s();
                lock.stor();
                assert_eq!(lock.state(), LockState::Read(1));
                lock.drop_r();
                assert_eq!(lock.bits(), 0);
            }

            #[test]
            fn failed_try_rtos_does_not_move_word_on_net() {
                let lock = <$lock>::new();
                lock.take_s();
                lock.take_r();
                let before = lock.bits();
                assert!(!lock.try_rtos());
                assert_eq!(lock.bits(), before, "a failed upgrade must not change the word");
                lock.drop_r();
                lock.drop_s();
                assert_eq!(lock.bits(), 0);
            }

            #[test]
            fn failed_try_rtow_leaves_reader_for_caller_to_drop() {
                let lock = <$lock>::new();
                lock.take_w();
                // A second, independent reader can't even get in, so simulate
                // the R-held-already case on a fresh lock instead.
                lock.drop_w();

                lock.take_s();
                lock.take_r();
                assert!(!lock.try_rtow());
                // Still holding our own R; the caller is responsible for it.
                lock.drop_r();
                lock.drop_s();
                assert_eq!(lock.bits(), 0);
            }

            #[test]
            fn unlocked_is_the_default() {
                let lock = <$lock>::default();
                assert_eq!(lock.state(), LockState::Unlocked);
            }

            #[test]
            fn debug_format_does_not_panic() {
                let lock = <$lock>::new();
                lock.take_r();
                let _ = format!("{:?}", lock);
                lock.drop_r();
            }
        }
    };
}

basic_tests!(w32, PLock32);
basic_tests!(w64, PLock64);
