//! Tiered load-factor policy driving growth and shrinkage.
//!
//! Three capacity tiers each carry their own growth and shrink
//! thresholds, kept as a static ordered table rather than inline
//! conditionals. The boundaries intentionally match the probing engine's
//! historical behavior: the small tier reaches up to 20 000 slots even
//! though linear probing stops at 2000 (that constant lives in `probe`
//! and only selects the step formula).
//!
//! Known tension, preserved as-is: near a tier boundary the growth and
//! shrink thresholds can overlap so that a table hovering there grows and
//! shrinks repeatedly. The integration suite pins the current interplay.

/// Absolute maximum slot count.
pub const MAX_CAPACITY: u64 = 4_000_000_000;

struct Tier {
    /// First capacity that belongs to the *next* tier.
    ceiling: u64,
    growth_at: f64,
    shrink_at: f64,
}

/// Ordered smallest-first; lookup takes the first tier whose ceiling the
/// capacity has not reached.
const TIERS: &[Tier] = &[
    Tier { ceiling: 20_000, growth_at: 0.70, shrink_at: 0.40 },
    Tier { ceiling: 200_000, growth_at: 0.80, shrink_at: 0.50 },
    Tier { ceiling: u64::MAX, growth_at: 0.90, shrink_at: 0.50 },
];

fn tier_for(capacity: usize) -> &'static Tier {
    let capacity = capacity as u64;
    TIERS
        .iter()
        .find(|t| capacity < t.ceiling)
        .unwrap_or(&TIERS[TIERS.len() - 1])
}

/// True when `occupied` entries in `capacity` slots meet the tier's
/// growth threshold. Zero and the absolute maximum are excluded: an empty
/// table never grows and a maxed-out one cannot.
pub(crate) fn should_grow(occupied: usize, capacity: usize) -> bool {
    if occupied == 0 || occupied as u64 == MAX_CAPACITY {
        return false;
    }
    occupied as f64 / capacity as f64 >= tier_for(capacity).growth_at
}

/// Mirror of [`should_grow`] against the shrink threshold.
pub(crate) fn should_shrink(occupied: usize, capacity: usize) -> bool {
    if occupied == 0 || occupied as u64 == MAX_CAPACITY {
        return false;
    }
    occupied as f64 / capacity as f64 <= tier_for(capacity).shrink_at
}

/// Capacity after growing: doubled, capped at [`MAX_CAPACITY`].
pub(crate) fn grown_capacity(capacity: usize) -> usize {
    (capacity as u64 * 2).min(MAX_CAPACITY) as usize
}

/// Capacity after shrinking: twice the live entry count, capped at
/// [`MAX_CAPACITY`].
pub(crate) fn shrunk_capacity(occupied: usize) -> usize {
    (occupied as u64 * 2).min(MAX_CAPACITY) as usize
}
