//! strmap: an open-addressed map from short string keys to opaque byte
//! values, with tiered load-factor resizing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a self-contained map engine for allocation-sensitive hosts.
//!   The map owns its slot array outright, resolves collisions by
//!   probing, and resizes itself under a tiered load-factor policy.
//! - Layers, leaf-first:
//!   - hash: FNV-1a string hash reduced modulo the table capacity
//!     (the "home slot" of a key).
//!   - probe: the deterministic probe sequence, used both to find a
//!     free slot and to find the slot holding a specific key. Linear
//!     stepping up to 2000 slots, an XOR-based step above that.
//!   - entry: one owned allocation per entry holding key and value
//!     contiguously; lookups hand out read-only `EntryView`s.
//!   - tiers: the growth/shrink schedule, a static ordered table of
//!     (capacity ceiling, growth threshold, shrink threshold).
//!   - map: `StrMap`, composing the above into set/get/delete and the
//!     grow/shrink rehash.
//!
//! Constraints
//! - Single-threaded and synchronous: every operation runs to
//!   completion, mutation requires `&mut StrMap`, no internal locking.
//! - Keys are short text strings, at most 63 bytes (64 with the stored
//!   NUL terminator); values are opaque byte slices of any length.
//! - One allocation per entry; the slot array is the only other
//!   allocation, rebuilt wholesale on resize while entries move by
//!   reference.
//! - Allocation failure is the only abnormal exit. It is surfaced as
//!   `MapError::OutOfMemory` via fallible reservation, and a failed
//!   operation never commits a partial mutation: a resize that cannot
//!   allocate leaves the table exactly as it was.
//!
//! Resize policy
//! - Three capacity tiers (small/medium/large) carry independent growth
//!   and shrink thresholds. The growth check runs *before* an insert,
//!   the shrink check *after* a removal, which keeps `occupied` strictly
//!   below `capacity` so a probe for a free slot always terminates.
//!
//! Notes and non-goals
//! - No persistence; the slot layout is not exposed or stable.
//! - No concurrent access; callers share the map by external means.
//! - Iteration order is slot order of the moment, nothing more.
//! - Keys are not generic; the engine is specialized to text keys and
//!   byte-slice values on purpose.
//! - Logging goes through the `log` facade (resize transitions at
//!   debug level); no logger is installed here.

mod entry;
mod error;
mod hash;
mod map;
mod probe;
mod tiers;

// Public surface
pub use entry::{EntryView, MAX_KEY_LEN};
pub use error::MapError;
pub use map::{DeleteBy, StrMap};
pub use tiers::MAX_CAPACITY;
