//! Entry storage: one owned allocation per key/value pair.
//!
//! An entry's key and value share a single contiguous block laid out as
//! `[key bytes][NUL][value bytes]`, so storing or freeing an entry costs
//! one allocation and the pair stays co-located. The NUL terminator is
//! part of the stored form (the hash mixes it in), and the stored key
//! length is the only offset needed to recover both regions.

use crate::error::MapError;

/// Maximum key length in bytes, terminator included.
pub const MAX_KEY_LEN: usize = 64;

/// A single live map entry, owned exclusively by its slot.
#[derive(Debug)]
pub(crate) struct Entry {
    block: Box<[u8]>,
    key_len: usize,
}

impl Entry {
    /// Materialize an entry for `key`/`value` in one block.
    pub(crate) fn new(key: &str, value: &[u8]) -> Result<Self, MapError> {
        let key_len = key.len();
        if key_len + 1 > MAX_KEY_LEN {
            return Err(MapError::InvalidKeyLength { len: key_len });
        }
        let block = build_block(key.as_bytes(), value)?;
        Ok(Self { block, key_len })
    }

    /// Swap in a new value, keeping the key region intact.
    ///
    /// Builds the replacement block before releasing the old one; on
    /// allocation failure the entry is untouched.
    pub(crate) fn replace_value(&mut self, value: &[u8]) -> Result<(), MapError> {
        let block = build_block(self.key_bytes(), value)?;
        self.block = block;
        Ok(())
    }

    fn key_bytes(&self) -> &[u8] {
        &self.block[..self.key_len]
    }

    pub(crate) fn key(&self) -> &str {
        // SAFETY: the key region is copied verbatim from a `&str` in
        // `new` and never rewritten afterwards, so it stays valid UTF-8.
        unsafe { core::str::from_utf8_unchecked(self.key_bytes()) }
    }

    pub(crate) fn value(&self) -> &[u8] {
        &self.block[self.key_len + 1..]
    }

    pub(crate) fn view(&self) -> EntryView<'_> {
        EntryView { entry: self }
    }
}

/// Copy `key` + NUL + `value` into a freshly reserved block. The reserve
/// is fallible so an out-of-memory condition surfaces as an error
/// instead of aborting.
fn build_block(key: &[u8], value: &[u8]) -> Result<Box<[u8]>, MapError> {
    let len = key.len() + 1 + value.len();
    let mut block = Vec::new();
    block
        .try_reserve_exact(len)
        .map_err(|_| MapError::OutOfMemory)?;
    block.extend_from_slice(key);
    block.push(0);
    block.extend_from_slice(value);
    Ok(block.into_boxed_slice())
}

/// Read-only view of one entry, handed out by lookups and iteration.
///
/// Borrows the map; any mutation of the map ends the borrow.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    entry: &'a Entry,
}

impl<'a> EntryView<'a> {
    /// The entry's key text.
    pub fn key(&self) -> &'a str {
        self.entry.key()
    }

    /// The entry's value bytes, exactly as last set.
    pub fn value(&self) -> &'a [u8] {
        self.entry.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: an entry reproduces its key and value byte-for-byte.
    #[test]
    fn round_trips_key_and_value() {
        let e = Entry::new("session", b"\x00\x01\xff payload").unwrap();
        assert_eq!(e.key(), "session");
        assert_eq!(e.value(), b"\x00\x01\xff payload");
        assert_eq!(e.view().key(), "session");
        assert_eq!(e.view().value(), b"\x00\x01\xff payload");
    }

    /// Invariant: the block is laid out `[key][NUL][value]` with no gaps.
    #[test]
    fn single_block_layout() {
        let e = Entry::new("ab", b"xyz").unwrap();
        assert_eq!(&*e.block, b"ab\0xyz");
        assert_eq!(e.block.len(), 2 + 1 + 3);
    }

    /// Invariant: replacing the value rewrites the value region only and
    /// accepts both growth and shrinkage.
    #[test]
    fn replace_value_keeps_key() {
        let mut e = Entry::new("k", b"short").unwrap();
        e.replace_value(b"a considerably longer value").unwrap();
        assert_eq!(e.key(), "k");
        assert_eq!(e.value(), b"a considerably longer value");

        e.replace_value(b"").unwrap();
        assert_eq!(e.key(), "k");
        assert_eq!(e.value(), b"");
    }

    /// Invariant: a 63-byte key (64 with terminator) is the longest
    /// accepted; one more byte fails with `InvalidKeyLength`.
    #[test]
    fn key_length_boundary() {
        let longest = "x".repeat(MAX_KEY_LEN - 1);
        assert!(Entry::new(&longest, b"v").is_ok());

        let too_long = "x".repeat(MAX_KEY_LEN);
        match Entry::new(&too_long, b"v") {
            Err(MapError::InvalidKeyLength { len }) => assert_eq!(len, MAX_KEY_LEN),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    /// Invariant: empty keys and empty values are both well-formed.
    #[test]
    fn empty_key_and_value() {
        let e = Entry::new("", b"").unwrap();
        assert_eq!(e.key(), "");
        assert_eq!(e.value(), b"");
        assert_eq!(&*e.block, b"\0");
    }
}
