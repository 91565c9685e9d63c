//! An append/remove vector that mints a permanent unique id for every element.

use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::guarded::Guarded;
use crate::lock::{RawLock, SpinLock};

/// An element of an [`IdVec`]: its permanent id and a shared handle to the value.
pub struct Entry<T> {
    /// Unique for the lifetime of the owning container, never reused.
    pub id: u64,
    /// Shared-ownership handle; the value outlives removal as long as handles exist.
    pub value: Arc<T>,
}

/// Cloning an `Entry` clones the handle, not the value, so no `T: Clone` bound.
impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Entry {
            id: self.id,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("value", &self.value)
            .finish()
    }
}

/// A thread-safe vector whose every inserted element receives a permanent, globally
/// unique id from a monotonic counter.
///
/// Lookups and removals address elements by id and scan linearly, O(len). The lock type
/// is pluggable like [`Guarded`]'s.
///
/// The id counter is independent of the vector's lock: [`insert`] takes its id with a
/// relaxed fetch-add *before* acquiring write access for the append. Ids are therefore
/// pairwise distinct across all concurrent inserts, but the order in which entries land
/// in the sequence is the order in which each insert won the lock, which may differ from
/// ascending id order. [`snapshot`] observes that sequence order.
///
/// [`insert`]: IdVec::insert
/// [`snapshot`]: IdVec::snapshot
pub struct IdVec<T, L: RawLock = SpinLock> {
    /// Monotonic id source. Never reset; removal does not return ids to it.
    next_id: AtomicU64,
    entries: Guarded<Vec<Entry<T>>, L>,
}

impl<T, L: RawLock> IdVec<T, L> {
    /// Creates an empty container with its counter at zero.
    pub fn new() -> Self {
        IdVec {
            next_id: AtomicU64::new(0),
            entries: Guarded::new(Vec::new()),
        }
    }

    /// Appends `value`, returning its entry with a freshly minted id.
    ///
    /// The returned id is never returned by any other `insert` on this container.
    pub fn insert(&self, value: T) -> Entry<T> {
        // Relaxed is enough: id uniqueness needs only the atomicity of the fetch-add,
        // not an ordering relative to the append below.
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Entry {
            id,
            value: Arc::new(value),
        };
        self.entries.with_write(|entries| entries.push(entry.clone()));
        entry
    }

    /// Finds the entry with the given id, or `None` if no element has it.
    ///
    /// O(len) linear scan under the lock.
    pub fn get(&self, id: u64) -> Option<Entry<T>> {
        self.entries
            .with_read(|entries| entries.iter().find(|e| e.id == id).cloned())
    }

    /// Removes and returns the entry with the given id.
    ///
    /// Returns `None` and leaves the container unmodified if no element has the id. The
    /// id is not returned to the counter; it will never be minted again. O(len).
    pub fn remove(&self, id: u64) -> Option<Entry<T>> {
        self.entries.with_write(|entries| {
            let index = entries.iter().position(|e| e.id == id)?;
            Some(entries.remove(index))
        })
    }

    /// Returns the number of elements currently in the container.
    pub fn len(&self) -> usize {
        self.entries.with_read(Vec::len)
    }

    /// Returns `true` if the container holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the current entries, in insertion-completion order.
    ///
    /// That is the order in which each insert acquired write access, which under
    /// concurrency may differ from ascending id order.
    pub fn snapshot(&self) -> Vec<Entry<T>> {
        self.entries.with_read(|entries| entries.to_vec())
    }
}

impl<T, L: RawLock> Default for IdVec<T, L> {
    fn default() -> Self {
        IdVec::new()
    }
}

/// Builds a container from initial items, assigning ids `0..n-1` in iterator order and
/// starting the counter at `n`.
impl<T, L: RawLock> FromIterator<T> for IdVec<T, L> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let entries: Vec<Entry<T>> = iter
            .into_iter()
            .enumerate()
            .map(|(id, value)| Entry {
                id: id as u64,
                value: Arc::new(value),
            })
            .collect();
        IdVec {
            next_id: AtomicU64::new(entries.len() as u64),
            entries: Guarded::new(entries),
        }
    }
}

impl<T: Debug, L: RawLock> Debug for IdVec<T, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot()).finish()
    }
}
