// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Optional RAII/typestate ergonomics layered on top of the raw PLock32/
// PLock64 operations. No new lock-word semantics are introduced here —
// every method below delegates straight to a raw take/drop/upgrade call.
//
// The point is to push the "a failed upgrade does not drop R for you"
// contract into the type system: a failed upgrade hands the caller back
// the same guard, still holding R, as an `Err` — so there's no bare
// boolean to ignore and no way to retry without either dropping that
// guard or trying again through it.
//
// The extended join/claim pipeline (rtoj/jtoc/rtoc/ctoa/take_j/drop_c) is
// intentionally not wrapped here: its multi-party rendezvous doesn't map
// onto a single "one thread owns one handle" model as cleanly as the
// five primary states do, so it stays available only through the raw
// lock types.

/// The raw operations a guard needs. Implemented by both [`PLock32`] and
/// [`PLock64`] so the guard types are generic over word width.
///
/// [`PLock32`]: crate::PLock32
/// [`PLock64`]: crate::PLock64
pub trait RawLock {
    fn take_r(&self);
    fn try_r(&self) -> bool;
    fn drop_r(&self);

    fn take_s(&self);
    fn drop_s(&self);

    fn take_w(&self);
    fn drop_w(&self);

    fn take_a(&self);
    fn try_a(&self) -> bool;
    fn drop_a(&self);

    fn stow(&self);
    fn wtos(&self);
    fn stor(&self);
    fn wtor(&self);

    fn try_rtos(&self) -> bool;
    fn try_rtow(&self) -> bool;
    fn try_rtoa(&self) -> bool;

    fn ator(&self);
}

macro_rules! impl_raw_lock {
    ($ty:ty) => {
        impl RawLock for $ty {
            fn take_r(&self) {
                <$ty>::take_r(self)
            }
            fn try_r(&self) -> bool {
                <$ty>::try_r(self)
            }
            fn drop_r(&self) {
                <$ty>::drop_r(self)
            }
            fn take_s(&self) {
                <$ty>::take_s(self)
            }
            fn drop_s(&self) {
                <$ty>::drop_s(self)
            }
            fn take_w(&self) {
                <$ty>::take_w(self)
            }
            fn drop_w(&self) {
                <$ty>::drop_w(self)
            }
            fn take_a(&self) {
                <$ty>::take_a(self)
            }
            fn try_a(&self) -> bool {
                <$ty>::try_a(self)
            }
            fn drop_a(&self) {
                <$ty>::drop_a(self)
            }
            fn stow(&self) {
                <$ty>::stow(self)
            }
            fn wtos(&self) {
                <$ty>::wtos(self)
            }
            fn stor(&self) {
                <$ty>::stor(self)
            }
            fn wtor(&self) {
                <$ty>::wtor(self)
            }
            fn try_rtos(&self) -> bool {
                <$ty>::try_rtos(self)
            }
            fn try_rtow(&self) -> bool {
                <$ty>::try_rtow(self)
            }
            fn try_rtoa(&self) -> bool {
                <$ty>::try_rtoa(self)
            }
            fn ator(&self) {
                <$ty>::ator(self)
            }
        }
    };
}

impl_raw_lock!(crate::PLock32);
impl_raw_lock!(crate::PLock64);

/// A held read (shared) claim.
pub struct ReadGuard<'a, L: RawLock>(&'a L);

impl<'a, L: RawLock> ReadGuard<'a, L> {
    /// Acquire R, blocking as needed.
    pub fn acquire(lock: &'a L) -> Self {
        lock.take_r();
        Self(lock)
    }

    /// Attempt to acquire R without blocking.
    pub fn try_acquire(lock: &'a L) -> Option<Self> {
        if lock.try_r() {
            Some(Self(lock))
        } else {
            None
        }
    }

    /// Attempt to upgrade to the seeker state. On failure, returns this
    /// same guard (still holding R) so the caller must explicitly dispose
    /// of it before retrying.
    pub fn try_upgrade_to_seek(self) -> Result<SeekGuard<'a, L>, Self> {
        if self.0.try_rtos() {
            let lock = self.0;
            std::mem::forget(self);
            Ok(SeekGuard(lock))
        } else {
            Err(self)
        }
    }

    /// Attempt a direct upgrade to the exclusive writer state.
    pub fn try_upgrade_to_write(self) -> Result<WriteGuard<'a, L>, Self> {
        if self.0.try_rtow() {
            let lock = self.0;
            std::mem::forget(self);
            Ok(WriteGuard(lock))
        } else {
            Err(self)
        }
    }

    /// Attempt to convert this reader claim into an atomic-writer claim.
    pub fn try_upgrade_to_atomic(self) -> Result<AtomicGuard<'a, L>, Self> {
        if self.0.try_rtoa() {
            let lock = self.0;
            std::mem::forget(self);
            Ok(AtomicGuard(lock))
        } else {
            Err(self)
        }
    }
}

impl<'a, L: RawLock> Drop for ReadGuard<'a, L> {
    fn drop(&mut self) {
        self.0.drop_r();
    }
}

/// A held seek claim: a unique reader-who-plans-to-write.
pub struct SeekGuard<'a, L: RawLock>(&'a L);

impl<'a, L: RawLock> SeekGuard<'a, L> {
    /// Acquire S, blocking as needed.
    pub fn acquire(lock: &'a L) -> Self {
        lock.take_s();
        Self(lock)
    }

    /// Take the exclusive write bit while already holding S. Cannot fail:
    /// S-exclusion guarantees no other writer can be contending.
    pub fn upgrade_to_write(self) -> WriteGuard<'a, L> {
        self.0.stow();
        let lock = self.0;
        std::mem::forget(self);
        WriteGuard(lock)
    }

    /// Release the seek claim, keeping a plain reader claim.
    pub fn downgrade_to_read(self) -> ReadGuard<'a, L> {
        self.0.stor();
        let lock = self.0;
        std::mem::forget(self);
        ReadGuard(lock)
    }
}

impl<'a, L: RawLock> Drop for SeekGuard<'a, L> {
    fn drop(&mut self) {
        self.0.drop_s();
    }
}

/// A held exclusive write claim.
pub struct WriteGuard<'a, L: RawLock>(&'a L);

impl<'a, L: RawLock> WriteGuard<'a, L> {
    /// Acquire W, blocking as needed.
    pub fn acquire(lock: &'a L) -> Self {
        lock.take_w();
        Self(lock)
    }

    /// Release the write bit, keeping the seek claim.
    pub fn downgrade_to_seek(self) -> SeekGuard<'a, L> {
        self.0.wtos();
        let lock = self.0;
        std::mem::forget(self);
        SeekGuard(lock)
    }

    /// Release both write and seek bits, keeping a plain reader claim.
    pub fn downgrade_to_read(self) -> ReadGuard<'a, L> {
        self.0.wtor();
        let lock = self.0;
        std::mem::forget(self);
        ReadGuard(lock)
    }
}

impl<'a, L: RawLock> Drop for WriteGuard<'a, L> {
    fn drop(&mut self) {
        self.0.drop_w();
    }
}

/// A held atomic-writer claim (coexists with other atomic writers).
pub struct AtomicGuard<'a, L: RawLock>(&'a L);

impl<'a, L: RawLock> AtomicGuard<'a, L> {
    /// Acquire A, blocking as needed.
    pub fn acquire(lock: &'a L) -> Self {
        lock.take_a();
        Self(lock)
    }

    /// Attempt to acquire A without blocking on a conflicting seeker.
    pub fn try_acquire(lock: &'a L) -> Option<Self> {
        if lock.try_a() {
            Some(Self(lock))
        } else {
            None
        }
    }

    /// Downgrade to a plain reader claim.
    pub fn downgrade_to_read(self) -> ReadGuard<'a, L> {
        self.0.ator();
        let lock = self.0;
        std::mem::forget(self);
        ReadGuard(lock)
    }
}

impl<'a, L: RawLock> Drop for AtomicGuard<'a, L> {
    fn drop(&mut self) {
        self.0.drop_a();
    }
}
