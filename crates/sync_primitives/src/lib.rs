//! Mutual-exclusion and pointer-tagging primitives for building concurrent data structures.
//!
//! This is a small toolkit of building blocks, leaves first:
//! -   [`SpinLock`]: non-reentrant mutual exclusion on a single atomic flag. Contended
//!     acquires spin briefly, then block until the holder wakes them.
//! -   [`Guarded`]: a value paired with a lock. Under concurrency the value is only
//!     reachable through closures that run with the lock held.
//! -   [`IdVec`]: a guarded vector whose entries receive permanent unique ids from an
//!     atomic counter. Ids are never reused, even after removal.
//! -   [`TaggedPtr`] and [`AtomicTaggedPtr`]: a pointer and a 16-bit tag packed into one
//!     64-bit word that `compare_exchange` treats as a single unit, so lock-free
//!     algorithms can bump the tag on every mutation and stale exchanges fail even when
//!     a pointer value recurs (the ABA problem).
//!
//! The toolkit accepts the following limitations:
//! -   [`TaggedPtr`] only represents addresses below 2^48; higher address bits are
//!     discarded on encode.
//! -   `with_read`/`with_write` hold the lock for the whole callback. Callbacks must be
//!     short, must not re-acquire the same guard, and must agree on an acquisition order
//!     when taking several guards.
//! -   There is no fairness guarantee; a waiter can be starved under sustained
//!     contention.

#![deny(missing_docs)]

pub mod guarded;
pub mod id_vec;
pub mod lock;
pub mod tagged;


pub use guarded::Guarded;
pub use id_vec::{Entry, IdVec};
pub use lock::{RawLock, SpinLock};
pub use tagged::{AtomicTaggedPtr, BoolTaggedPtr, TagBits, TaggedPtr, VersionedPtr};
