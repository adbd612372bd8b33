//! Table sizing limits and defaults.
//!
//! All numbers that steer array/hash placement and resizing live here so a
//! table can be built with small limits to exercise edge cases.

/// Array segment size allocated the first time the array is needed.
pub const DEFAULT_ARRAY_CAPACITY: usize = 32;

/// Initial reservation for a hash map on its first insertion.
pub const DEFAULT_HASH_CAPACITY: usize = 32;

/// Number of magnitude buckets the resize engine counts keys into.
/// Keys above `2^MAX_BITS` never migrate into the array segment.
pub const MAX_BITS: usize = 32;

/// Integer keys at or above this index always live in the hash segment.
pub const MAX_ARRAY_INDEX: usize = 67_108_864;

/// Upper bound on repeated resize rounds triggered by a single growth.
pub const MAX_RESIZE_ROUNDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLimits {
    pub array_capacity: usize,
    pub hash_capacity: usize,
    pub max_bits: usize,
    pub max_array_index: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            array_capacity: DEFAULT_ARRAY_CAPACITY,
            hash_capacity: DEFAULT_HASH_CAPACITY,
            max_bits: MAX_BITS,
            max_array_index: MAX_ARRAY_INDEX,
        }
    }
}

impl TableLimits {
    /// Bring every field into the range the table engine relies on.
    ///
    /// Fields are public, so a struct literal can bypass the `with_*`
    /// builders; tables apply this on construction.
    pub fn clamped(self) -> Self {
        Self {
            array_capacity: self.array_capacity.max(1),
            hash_capacity: self.hash_capacity,
            max_bits: self.max_bits.min(usize::BITS as usize - 2),
            max_array_index: self.max_array_index.max(2),
        }
    }

    /// Array capacity is kept at one or more so index 1 is always array-eligible.
    pub fn with_array_capacity(mut self, capacity: usize) -> Self {
        self.array_capacity = capacity.max(1);
        self
    }

    pub fn with_hash_capacity(mut self, capacity: usize) -> Self {
        self.hash_capacity = capacity;
        self
    }

    pub fn with_max_bits(mut self, bits: usize) -> Self {
        self.max_bits = bits.min(usize::BITS as usize - 2);
        self
    }

    pub fn with_max_array_index(mut self, index: usize) -> Self {
        self.max_array_index = index.max(2);
        self
    }
}
