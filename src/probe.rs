//! Probe sequences for collision resolution.
//!
//! All entries live directly in the slot array; when a key's home slot is
//! taken, the probe sequence supplies the next candidates. Small tables
//! (at most [`SMALL_TABLE_MAX`] slots) step linearly. Wider tables step by
//! `(slot + (step ^ 2)) % size` with the counter seeded at 1. The `^`
//! there is bitwise XOR with the constant 2, not a square: the formula is
//! historical and kept verbatim. The free-slot and by-key walks share one
//! sequence; insertion and lookup must visit the same candidates in the
//! same order or displaced entries become unreachable.
//!
//! Both walks reset the candidate to slot 0 whenever `slot + 1 >= size`
//! before stepping, which both wraps the linear walk and keeps every
//! computed candidate in bounds.

use crate::entry::Entry;
use crate::error::MapError;

/// Largest table that still probes linearly.
pub(crate) const SMALL_TABLE_MAX: usize = 2000;

/// Transient cursor over a probe sequence. Lives only for the duration of
/// a single lookup or insert.
pub(crate) struct ProbeState {
    slot: usize,
    step: u64,
}

impl ProbeState {
    /// Start a probe walk at `slot` with the step counter at `step`.
    /// Both entry points seed the counter with 1: the wide-table step
    /// depends on the counter, and the free-slot and by-key walks must
    /// trace the same sequence or an entry placed after a collision
    /// would land on a slot no lookup ever visits.
    pub(crate) fn new(slot: usize, step: u64) -> Self {
        Self { slot, step }
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }

    /// Advance to the next candidate slot in a table of `size` slots.
    pub(crate) fn advance(&mut self, size: usize) {
        if self.slot + 1 >= size {
            self.slot = 0;
        }
        if size <= SMALL_TABLE_MAX {
            self.slot += 1;
            // Only a one-slot table can step past the end here; for any
            // larger table the reset above already bounded the candidate.
            if self.slot >= size {
                self.slot = 0;
            }
        } else {
            self.slot = (self.slot + (self.step ^ 2) as usize) % size;
            self.step += 1;
        }
    }
}

/// Walk the probe sequence from `start` until an empty slot turns up.
///
/// `occupied == slots.len()` means no empty slot can exist, which the
/// resize policy is supposed to prevent; it is reported as `Overflow`
/// rather than looping forever.
pub(crate) fn find_free_slot(
    slots: &[Option<Entry>],
    occupied: usize,
    start: usize,
) -> Result<usize, MapError> {
    if occupied == slots.len() {
        return Err(MapError::Overflow);
    }

    let mut probe = ProbeState::new(start, 1);
    while slots[probe.slot()].is_some() {
        probe.advance(slots.len());
    }
    Ok(probe.slot())
}

/// Walk up to `slots.len() + 1` candidates from `start`, looking for a
/// live entry whose key is byte-for-byte equal to `key`.
///
/// `None` is an ordinary miss, distinct from any error: `set` uses it to
/// choose between overwriting and inserting.
pub(crate) fn find_slot_by_key(
    slots: &[Option<Entry>],
    start: usize,
    key: &str,
) -> Option<usize> {
    let size = slots.len();
    let mut probe = ProbeState::new(start, 1);

    // Two distinct keys can share a home slot, so the worst case walks
    // the entire table once.
    for _ in 0..=size {
        if let Some(entry) = &slots[probe.slot()] {
            if entry.key() == key {
                return Some(probe.slot());
            }
        }
        probe.advance(size);
    }

    None
}
