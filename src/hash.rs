//! String hashing: 64-bit FNV-1a reduced modulo the table capacity.

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 14695981039346656037;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 1099511628211;

/// Mix `key` with FNV-1a and reduce the result into `[0, capacity)`.
///
/// Entries store their key NUL-terminated, and the terminator byte
/// participates in the mix (one trailing XOR-with-zero and multiply).
/// Rehashing on resize walks the exact same sequence, so the trailing
/// round is load-bearing and must not be dropped.
#[inline]
pub(crate) fn home_slot(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "capacity invariant violated");

    let mut hash = FNV_OFFSET_BASIS;
    for &byte in key.as_bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    // Terminator round: XOR 0 is a no-op, the multiply is not.
    hash = hash.wrapping_mul(FNV_PRIME);

    (hash % capacity as u64) as usize
}
