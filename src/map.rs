//! The map engine: slot array ownership, insert/lookup/delete, and the
//! grow/shrink rehash.

use crate::entry::{Entry, EntryView, MAX_KEY_LEN};
use crate::error::MapError;
use crate::hash::home_slot;
use crate::probe::{find_free_slot, find_slot_by_key};
use crate::tiers::{
    grown_capacity, should_grow, should_shrink, shrunk_capacity, MAX_CAPACITY,
};

/// How `delete_item` identifies its target.
///
/// `Index` is the fast path for callers that already know a slot (for
/// example from iteration); `Key` hashes and probes like a lookup.
#[derive(Debug, Clone, Copy)]
pub enum DeleteBy<'a> {
    Key(&'a str),
    Index(usize),
}

/// Direction of a rehash. Growth doubles the table; shrinkage sizes it to
/// twice the live entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResizeDirection {
    Grow,
    Shrink,
}

/// An open-addressed map from short string keys to opaque byte values.
///
/// The map owns a fixed slot array; every entry lives directly in its
/// slot (no chaining) and collisions resolve by probing. A tiered
/// load-factor policy grows the table before an insert that would cross
/// the tier's growth threshold and shrinks it after a removal that drops
/// below the shrink threshold, so an empty slot is always reachable.
///
/// Invariants: `capacity > 0` after construction, `occupied < capacity`
/// at all times, and keys of live entries are pairwise distinct.
#[derive(Debug)]
pub struct StrMap {
    slots: Box<[Option<Entry>]>,
    occupied: usize,
}

impl StrMap {
    /// Create a map with `capacity` empty slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::InvalidSize);
        }
        Ok(Self {
            slots: alloc_slots(capacity)?,
            occupied: 0,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Current slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Insert `value` under `key`, replacing the value in place if the
    /// key is already present (`occupied` is unchanged in that case).
    ///
    /// A growth check runs before the insert, so the slot array may
    /// double as a side effect of a successful `set`.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<(), MapError> {
        validate_key(key)?;
        if self.occupied as u64 >= MAX_CAPACITY {
            return Err(MapError::Overflow);
        }

        // Grow ahead of the insert that would cross the threshold, so the
        // new entry lands in the resized table.
        if should_grow(self.occupied + 1, self.capacity()) {
            self.resize(ResizeDirection::Grow)?;
        }

        let home = home_slot(key, self.capacity());
        if self.slots[home].is_none() {
            self.slots[home] = Some(Entry::new(key, value)?);
            self.occupied += 1;
            return Ok(());
        }

        // Home slot is taken: either this key already lives somewhere on
        // its probe sequence, or the nearest free slot takes the entry.
        match find_slot_by_key(&self.slots, home, key) {
            Some(found) => match &mut self.slots[found] {
                Some(entry) => entry.replace_value(value),
                // find_slot_by_key only returns occupied slots.
                None => Err(MapError::ItemNotFound),
            },
            None => {
                let free = find_free_slot(&self.slots, self.occupied, home)?;
                self.slots[free] = Some(Entry::new(key, value)?);
                self.occupied += 1;
                Ok(())
            }
        }
    }

    /// Look up `key`, returning a read-only view of its entry.
    ///
    /// Lookup misses are uniform: a key that `set` would reject (too
    /// long, interior NUL) can never be present and reports
    /// `ItemNotFound` like any other absent key.
    pub fn get(&self, key: &str) -> Result<EntryView<'_>, MapError> {
        let home = home_slot(key, self.capacity());
        match find_slot_by_key(&self.slots, home, key) {
            Some(found) => match &self.slots[found] {
                Some(entry) => Ok(entry.view()),
                None => Err(MapError::ItemNotFound),
            },
            None => Err(MapError::ItemNotFound),
        }
    }

    /// Report the slot index currently holding `key`, for use with
    /// [`DeleteBy::Index`]. Indices are positional: any resize rehashes
    /// the table and invalidates them.
    pub fn slot_index(&self, key: &str) -> Option<usize> {
        let home = home_slot(key, self.capacity());
        find_slot_by_key(&self.slots, home, key)
    }

    /// Remove one entry, selected by key or by known slot index.
    ///
    /// A shrink check runs after the removal, so the slot array may be
    /// rebuilt smaller as a side effect.
    pub fn delete_item(&mut self, target: DeleteBy<'_>) -> Result<(), MapError> {
        let slot = match target {
            DeleteBy::Index(index) => {
                if index >= self.capacity() {
                    return Err(MapError::InvalidArgument);
                }
                if self.slots[index].is_none() {
                    return Err(MapError::ItemNotFound);
                }
                index
            }
            DeleteBy::Key(key) => {
                // Lookup path: an unstorable key is a miss, same as get.
                let home = home_slot(key, self.capacity());
                find_slot_by_key(&self.slots, home, key).ok_or(MapError::ItemNotFound)?
            }
        };

        self.slots[slot] = None;
        self.occupied -= 1;

        if should_shrink(self.occupied, self.capacity()) {
            self.resize(ResizeDirection::Shrink)?;
        }
        Ok(())
    }

    /// Drop every entry and null every slot. The slot array itself is
    /// kept, so the map stays initialized at its current capacity.
    pub fn delete_all(&mut self) {
        log::trace!("clearing {} entries, capacity {}", self.occupied, self.capacity());
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.occupied = 0;
    }

    /// Visit every live entry in slot order. The order is an artifact of
    /// hashing and resizing history; no stability is promised.
    pub fn iter(&self) -> impl Iterator<Item = EntryView<'_>> {
        self.slots.iter().filter_map(|s| s.as_ref().map(Entry::view))
    }

    /// Rebuild the slot array at the direction's target capacity and
    /// rehash every entry into it. Entries move by reference; only the
    /// slot array is reallocated.
    ///
    /// The new array is allocated before anything is touched, so an
    /// allocation failure leaves the map in its pre-resize state.
    fn resize(&mut self, direction: ResizeDirection) -> Result<(), MapError> {
        let new_capacity = match direction {
            ResizeDirection::Grow => grown_capacity(self.capacity()),
            ResizeDirection::Shrink => shrunk_capacity(self.occupied),
        };
        self.resize_to(new_capacity, direction)
    }

    fn resize_to(
        &mut self,
        new_capacity: usize,
        direction: ResizeDirection,
    ) -> Result<(), MapError> {
        let mut new_slots = alloc_slots(new_capacity)?;

        log::debug!(
            "resizing ({direction:?}): capacity {} -> {new_capacity}, occupied {}",
            self.capacity(),
            self.occupied,
        );

        for slot in self.slots.iter_mut() {
            if let Some(entry) = slot.take() {
                let mut target = home_slot(entry.key(), new_capacity);
                if new_slots[target].is_some() {
                    target = find_free_slot(&new_slots, self.occupied, target)?;
                }
                new_slots[target] = Some(entry);
            }
        }

        self.slots = new_slots;
        Ok(())
    }
}

/// Allocate a zero-initialized (all-empty) slot array, surfacing
/// allocation failure as `OutOfMemory`.
fn alloc_slots(capacity: usize) -> Result<Box<[Option<Entry>]>, MapError> {
    let mut slots: Vec<Option<Entry>> = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| MapError::OutOfMemory)?;
    slots.resize_with(capacity, || None);
    Ok(slots.into_boxed_slice())
}

/// Key validation for `set`. Keys are stored NUL-terminated, so an
/// interior NUL cannot be represented; lookups skip this and simply
/// miss, since no stored key can ever compare equal to a rejected one.
fn validate_key(key: &str) -> Result<(), MapError> {
    if key.as_bytes().contains(&0) {
        return Err(MapError::InvalidArgument);
    }
    if key.len() + 1 > MAX_KEY_LEN {
        return Err(MapError::InvalidKeyLength { len: key.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: growth is checked before the insert; crossing the small
    /// tier's 0.70 threshold doubles the capacity and every earlier key
    /// stays reachable with its value.
    #[test]
    fn grows_before_crossing_threshold() {
        let mut m = StrMap::with_capacity(4).unwrap();
        m.set("a", b"1").unwrap();
        m.set("b", b"2").unwrap();
        assert_eq!(m.capacity(), 4);

        // Third insert: (occupied + 1) / 4 = 0.75 >= 0.70, grow first.
        m.set("c", b"3").unwrap();
        assert_eq!(m.capacity(), 8);
        assert_eq!(m.len(), 3);
        for (k, v) in [("a", b"1"), ("b", b"2"), ("c", b"3")] {
            assert_eq!(m.get(k).unwrap().value(), v);
        }
    }

    /// Invariant: a removal that drops the load to the shrink threshold
    /// rebuilds the table at twice the live count.
    #[test]
    fn shrinks_after_delete() {
        let mut m = StrMap::with_capacity(10).unwrap();
        for k in ["a", "b", "c", "d", "e"] {
            m.set(k, b"v").unwrap();
        }
        assert_eq!(m.capacity(), 10);

        // 4/10 = 0.40 <= 0.40: shrink to occupied * 2 = 8.
        m.delete_item(DeleteBy::Key("e")).unwrap();
        assert_eq!(m.capacity(), 8);
        assert_eq!(m.len(), 4);
        for k in ["a", "b", "c", "d"] {
            assert!(m.get(k).is_ok());
        }
    }

    /// Invariant: a rehash relocates entries without losing any and
    /// leaves `occupied` untouched.
    #[test]
    fn resize_preserves_all_entries() {
        let mut m = StrMap::with_capacity(64).unwrap();
        for i in 0..30 {
            m.set(&format!("key-{i}"), format!("val-{i}").as_bytes()).unwrap();
        }
        let before = m.len();

        m.resize(ResizeDirection::Grow).unwrap();
        assert_eq!(m.capacity(), 128);
        assert_eq!(m.len(), before);
        for i in 0..30 {
            assert_eq!(
                m.get(&format!("key-{i}")).unwrap().value(),
                format!("val-{i}").as_bytes()
            );
        }

        m.resize(ResizeDirection::Shrink).unwrap();
        assert_eq!(m.capacity(), 60);
        assert_eq!(m.len(), before);
        for i in 0..30 {
            assert!(m.get(&format!("key-{i}")).is_ok());
        }
    }

    /// Invariant: a resize whose slot-array allocation fails reports
    /// `OutOfMemory` and leaves the map in its pre-resize state.
    #[test]
    fn failed_resize_allocation_leaves_map_intact() {
        let mut m = StrMap::with_capacity(8).unwrap();
        m.set("sticky", b"payload").unwrap();

        // A capacity no allocator can satisfy: the reservation fails
        // before any entry is moved.
        let res = m.resize_to(usize::MAX, ResizeDirection::Grow);
        assert_eq!(res, Err(MapError::OutOfMemory));

        assert_eq!(m.capacity(), 8);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("sticky").unwrap().value(), b"payload");
        m.set("more", b"x").unwrap();
        assert_eq!(m.len(), 2);
    }

    /// Invariant: deleting by slot index validates bounds and emptiness.
    #[test]
    fn delete_by_index_validation() {
        let mut m = StrMap::with_capacity(4).unwrap();
        m.set("a", b"1").unwrap();

        assert_eq!(
            m.delete_item(DeleteBy::Index(99)),
            Err(MapError::InvalidArgument)
        );

        let occupied_index = m.slot_index("a").unwrap();
        m.delete_item(DeleteBy::Index(occupied_index)).unwrap();
        assert_eq!(m.len(), 0);
        assert_eq!(
            m.delete_item(DeleteBy::Index(occupied_index)),
            Err(MapError::ItemNotFound)
        );
    }

    /// Invariant: keys with an interior NUL are rejected by `set` (the
    /// stored form could not represent them), while lookups treat them
    /// as ordinary misses.
    #[test]
    fn interior_nul_key_rejected_on_set_misses_on_lookup() {
        let mut m = StrMap::with_capacity(4).unwrap();
        assert_eq!(m.set("a\0b", b"v"), Err(MapError::InvalidArgument));
        assert_eq!(m.get("a\0b").err(), Some(MapError::ItemNotFound));
        assert_eq!(m.slot_index("a\0b"), None);
        assert_eq!(
            m.delete_item(DeleteBy::Key("a\0b")).err(),
            Some(MapError::ItemNotFound)
        );
        assert_eq!(m.len(), 0);
    }

    /// Invariant: a key too long to store is an ordinary lookup miss,
    /// though `set` still rejects it with the length error.
    #[test]
    fn over_long_key_misses_on_lookup() {
        let mut m = StrMap::with_capacity(4).unwrap();
        m.set("present", b"v").unwrap();

        let long = "x".repeat(MAX_KEY_LEN);
        assert_eq!(m.get(&long).err(), Some(MapError::ItemNotFound));
        assert_eq!(m.slot_index(&long), None);
        assert_eq!(
            m.delete_item(DeleteBy::Key(&long)).err(),
            Some(MapError::ItemNotFound)
        );
        assert_eq!(m.len(), 1);
    }

    /// Invariant: after `delete_all` the map is empty but initialized;
    /// capacity holds and the map accepts inserts again.
    #[test]
    fn delete_all_keeps_map_usable() {
        let mut m = StrMap::with_capacity(16).unwrap();
        for k in ["a", "b", "c"] {
            m.set(k, b"v").unwrap();
        }
        m.delete_all();
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
        assert_eq!(m.capacity(), 16);
        assert!(m.get("a").is_err());

        m.set("again", b"fresh").unwrap();
        assert_eq!(m.get("again").unwrap().value(), b"fresh");
    }

    /// Invariant: `occupied` never reaches `capacity`; the growth policy
    /// keeps an empty slot reachable through any insert sequence.
    #[test]
    fn occupancy_stays_below_capacity() {
        let mut m = StrMap::with_capacity(2).unwrap();
        for i in 0..50 {
            m.set(&format!("k{i}"), b"v").unwrap();
            assert!(
                m.len() < m.capacity(),
                "occupied {} reached capacity {}",
                m.len(),
                m.capacity()
            );
        }
    }
}
