//! Locks, and the capability trait that lets [`Guarded`](crate::Guarded) stay generic
//! over the lock implementation.

use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

/// Minimal mutual-exclusion capability: acquire, single attempt, release.
///
/// [`Guarded`](crate::Guarded) turns the mutual exclusion promised here into reference
/// safety, handing out `&T`/`&mut T` while the lock is held.
///
/// # Safety
///
/// Implementations must guarantee mutual exclusion: between a successful [`lock`] (or
/// `true`-returning [`try_lock`]) and the matching [`unlock`], no other `lock` returns
/// and no other `try_lock` returns `true`.
///
/// [`lock`]: RawLock::lock
/// [`try_lock`]: RawLock::try_lock
/// [`unlock`]: RawLock::unlock
pub unsafe trait RawLock: Default {
    /// Acquires the lock, blocking the calling thread until it is available.
    ///
    /// Never fails and never times out. Non-reentrant: calling `lock` on a lock the
    /// current thread already holds deadlocks that thread.
    fn lock(&self);

    /// Makes a single non-blocking acquisition attempt.
    ///
    /// Returns whether the lock was acquired. Failure is a normal outcome, not an
    /// error; it means another thread currently holds the lock.
    fn try_lock(&self) -> bool;

    /// Releases the lock.
    ///
    /// # Safety
    ///
    /// The caller must hold the lock. Releasing a lock that the current thread does not
    /// hold has an undefined outcome; it is a contract violation, not a checked error.
    unsafe fn unlock(&self);
}

/// Attempts before a contended [`SpinLock::lock`] gives up spinning and parks.
const SPIN_LIMIT: usize = 64;

/// Non-reentrant mutual exclusion on a single atomic boolean flag, true = held.
///
/// A contended `lock` spins a bounded number of times, then parks the thread until a
/// holder's `unlock` wakes it. `unlock` wakes at most one parked waiter. There is no
/// fairness guarantee: a waiter races every newly arriving thread for the flag and can
/// be starved under sustained contention.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
    /// Number of threads parked on `wake`. Guards the park/wake handshake: `unlock`
    /// takes this mutex after clearing the flag, so it either observes a registered
    /// waiter or the waiter re-checks the flag after registering.
    parked: Mutex<usize>,
    wake: Condvar,
}

impl SpinLock {
    /// Creates an unlocked lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow path: spin for a while, then park until woken and the flag is won.
    fn lock_contended(&self) {
        for _ in 0..SPIN_LIMIT {
            hint::spin_loop();
            if self.try_lock() {
                return;
            }
        }
        let mut parked = self.parked.lock().unwrap();
        loop {
            if self.try_lock() {
                return;
            }
            *parked += 1;
            parked = self.wake.wait(parked).unwrap();
            *parked -= 1;
        }
    }
}

// Safety: the flag is toggled with atomic swap/store; only a thread whose swap observed
// `false` proceeds, so at most one holder exists between that swap and its `unlock`.
unsafe impl RawLock for SpinLock {
    fn lock(&self) {
        if !self.try_lock() {
            self.lock_contended();
        }
    }

    fn try_lock(&self) -> bool {
        // Test-and-set: acquisition succeeded iff the previous value was `false`.
        !self.locked.swap(true, Ordering::Acquire)
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
        let parked = self.parked.lock().unwrap();
        if *parked > 0 {
            self.wake.notify_one();
        }
    }
}
