//! A value paired with the lock that serializes access to it.

use std::cell::UnsafeCell;
use std::fmt::{self, Debug, Formatter};

use crate::lock::{RawLock, SpinLock};

/// A value of type `T` whose every concurrent access runs under a lock of type `L`.
///
/// Under concurrency, the only sanctioned paths to the value are [`with_read`] and
/// [`with_write`], which run a closure with the lock held and release it on every exit
/// path, including a panicking closure. The lock type is pluggable; [`SpinLock`] is the
/// default.
///
/// For single-threaded phases (setup, teardown) there are escape hatches that skip the
/// lock: [`get_mut`] and [`into_inner`] are safe because they demand exclusive access at
/// compile time, and [`data_ptr`] is the raw form for the cases the borrow checker
/// cannot express.
///
/// Callbacks hold the lock for their whole duration. They must be short, must not
/// re-acquire the same guard (the lock is non-reentrant, so that deadlocks), and call
/// sites taking several guards must agree on an acquisition order.
///
/// [`with_read`]: Guarded::with_read
/// [`with_write`]: Guarded::with_write
/// [`get_mut`]: Guarded::get_mut
/// [`into_inner`]: Guarded::into_inner
/// [`data_ptr`]: Guarded::data_ptr
pub struct Guarded<T, L: RawLock = SpinLock> {
    lock: L,
    value: UnsafeCell<T>,
}

// Safety: same bounds as `std::sync::Mutex`. Sending the pair moves the `T`; sharing it
// is safe because every `&T`/`&mut T` handed out runs under the lock, so only `T: Send`
// is required, not `T: Sync`.
unsafe impl<T: Send, L: RawLock + Send> Send for Guarded<T, L> {}
unsafe impl<T: Send, L: RawLock + Sync> Sync for Guarded<T, L> {}

/// Releases the lock when dropped, so the accessors unlock on every exit path, panicking
/// closures included.
struct UnlockOnDrop<'a, L: RawLock>(&'a L);

impl<L: RawLock> Drop for UnlockOnDrop<'_, L> {
    fn drop(&mut self) {
        // Safety: an `UnlockOnDrop` is only constructed right after its lock was
        // acquired, and nothing else releases the lock before this drop runs.
        unsafe { self.0.unlock() }
    }
}

impl<T, L: RawLock> Guarded<T, L> {
    /// Wraps `value` with a fresh, unlocked lock.
    pub fn new(value: T) -> Self {
        Guarded {
            lock: L::default(),
            value: UnsafeCell::new(value),
        }
    }

    /// Runs `f` with a shared view of the value, under the lock.
    ///
    /// Returns `f`'s result. The lock is released when `f` returns or panics.
    pub fn with_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.lock.lock();
        let _unlock = UnlockOnDrop(&self.lock);
        // Safety: the lock is held, so per the `RawLock` contract no `with_write` is
        // running and no `&mut T` exists for the duration of this borrow.
        f(unsafe { &*self.value.get() })
    }

    /// Runs `f` with a mutable view of the value, under the lock.
    ///
    /// Returns `f`'s result. The lock is released when `f` returns or panics. Concurrent
    /// `with_write` calls behave as if totally ordered; no partial mutation is
    /// observable from any other `with_read`/`with_write` callback.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.lock.lock();
        let _unlock = UnlockOnDrop(&self.lock);
        // Safety: the lock is held, so this is the only reference to the value.
        f(unsafe { &mut *self.value.get() })
    }

    /// Returns the value without locking.
    ///
    /// Safe because `&mut self` proves no other thread holds a reference.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the pair, returning the value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// Returns a raw, unsynchronized pointer to the value.
    ///
    /// Escape hatch for single-threaded phases where a shared `Guarded` must be touched
    /// without the lock. Dereferencing it concurrently with any [`with_read`] or
    /// [`with_write`] call is undefined behavior; that contract is documented, not
    /// checked.
    ///
    /// [`with_read`]: Guarded::with_read
    /// [`with_write`]: Guarded::with_write
    pub fn data_ptr(&self) -> *mut T {
        self.value.get()
    }
}

impl<T: Default, L: RawLock> Default for Guarded<T, L> {
    fn default() -> Self {
        Guarded::new(T::default())
    }
}

impl<T: Debug, L: RawLock> Debug for Guarded<T, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Guarded");
        if self.lock.try_lock() {
            let _unlock = UnlockOnDrop(&self.lock);
            // Safety: `try_lock` succeeded, so the lock is held for this borrow.
            s.field("value", unsafe { &*self.value.get() });
        } else {
            s.field("value", &format_args!("<locked>"));
        }
        s.finish()
    }
}
