// Resize/rehash engine
//
// Picks the array segment size from the magnitude distribution of integer
// keys, the way Lua's ltable.c does: nums[i] counts keys k with
// 2^(i-1) < k <= 2^i, and the optimal size is the largest power of two n
// such that more than n/2 of the slots 1..=n would be in use.
use super::LuaTable;
use crate::lua_value::{LuaValue, TableKey};
use crate::lua_vm::lua_limits::MAX_RESIZE_ROUNDS;

/// Smallest `b` with `2^b >= n` (`n >= 1`)
#[inline]
pub(crate) fn ceil_log2(n: usize) -> usize {
    debug_assert!(n > 0);
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

/// Count `index` into its magnitude bucket. Returns false when it is beyond the last bucket.
#[inline]
fn count_index(nums: &mut [usize], index: usize) -> bool {
    match nums.get_mut(ceil_log2(index)) {
        Some(slot) => {
            *slot += 1;
            true
        }
        None => false,
    }
}

/// Sweep the buckets and return `(optimal_size, keys_in_array)`.
pub(crate) fn compute_sizes(nums: &[usize], total: usize) -> (usize, usize) {
    let mut a = 0; // keys <= 2^i
    let mut na = 0; // keys that will land in the array
    let mut optimal = 0;

    let mut twotoi = 1usize;
    for &count in nums {
        if twotoi / 2 >= total {
            break;
        }
        a += count;
        if a > twotoi / 2 {
            optimal = twotoi;
            na = a;
        }
        twotoi = match twotoi.checked_mul(2) {
            Some(next) => next,
            None => break,
        };
    }
    (optimal, na)
}

impl LuaTable {
    fn count_array_elements(&self, nums: &mut [usize]) -> usize {
        let mut used = 0;
        for (i, value) in self.array.iter().enumerate() {
            if !value.is_nil() && count_index(nums, i + 1) {
                used += 1;
            }
        }
        used
    }

    fn count_hash_elements(&self, nums: &mut [usize]) -> usize {
        let mut used = 0;
        for key in self.generic.keys() {
            if let Some(index) = key.as_positive_integer() {
                if index < self.limits.max_array_index && count_index(nums, index) {
                    used += 1;
                }
            }
        }
        used
    }

    /// Best array size for the integer keys currently held in both segments
    pub(crate) fn optimal_array_size(&self) -> usize {
        let mut nums = vec![0usize; self.limits.max_bits + 1];
        let total = self.count_array_elements(&mut nums) + self.count_hash_elements(&mut nums);
        let (optimal, in_array) = compute_sizes(&nums, total);
        tracing::trace!(total, optimal, in_array, "computed optimal array size");
        optimal.min(self.limits.max_array_index - 1)
    }

    /// Grow the array segment so it holds at least `min_size` slots.
    ///
    /// The new size is the largest of `min_size`, twice the current size and
    /// the optimal size from the key distribution, floored at the default
    /// array capacity. Generic entries that fall inside the new range move
    /// into the array. When the new array ends full and the generic map still
    /// continues the run at `size + 1`, another round runs with that as the
    /// minimum, up to `MAX_RESIZE_ROUNDS`.
    pub(crate) fn resize(&mut self, min_size: usize) {
        let mut min_size = min_size;
        for round in 0..MAX_RESIZE_ROUNDS {
            let old_size = self.array.len();
            let optimal = self.optimal_array_size();
            let new_size = min_size
                .max(old_size.saturating_mul(2))
                .max(optimal)
                .max(self.limits.array_capacity)
                .min(self.limits.max_array_index - 1);
            if new_size <= old_size {
                return;
            }

            let migrated = self.rebuild(new_size);
            tracing::debug!(round, old_size, new_size, optimal, migrated, "resized array segment");

            let next = new_size + 1;
            let tail_full = self.array.last().is_some_and(|v| !v.is_nil());
            if !(tail_full && self.generic.contains_key(&TableKey::index(next))) {
                return;
            }
            tracing::trace!(round, next, "hash segment continues the array, resizing again");
            min_size = next;
        }
        tracing::warn!(
            rounds = MAX_RESIZE_ROUNDS,
            size = self.array.len(),
            "array resize stopped at round limit"
        );
    }

    /// Reallocate the array at `new_size` slots and pull in generic entries
    /// whose index now fits. Returns the number of migrated entries.
    fn rebuild(&mut self, new_size: usize) -> usize {
        let mut array = Vec::with_capacity(new_size);
        array.append(&mut self.array);
        array.resize(new_size, LuaValue::Nil);

        let in_range = |key: &TableKey| key.as_positive_integer().is_some_and(|i| i <= new_size);
        let mut migrated = 0;
        self.generic.retain(|key, value| match key.as_positive_integer() {
            Some(index) if index <= new_size => {
                array[index - 1] = std::mem::take(value);
                migrated += 1;
                false
            }
            _ => true,
        });
        if migrated > 0 {
            self.order.retain(|key| !in_range(key));
        }

        self.array = array;
        migrated
    }

    /// Move the generic map's integer keys into the array when they are dense
    /// enough to be worth it. Returns true when the array grew.
    pub fn rehash(&mut self) -> bool {
        let optimal = self.optimal_array_size();
        if optimal <= self.array.len() {
            return false;
        }
        tracing::debug!(optimal, size = self.array.len(), "rehash grows array segment");
        self.resize(optimal);
        true
    }

    /// Absorb generic entries that continue the array past its end, so the
    /// array can grow by one slot without shadowing a hash key.
    pub(crate) fn absorb_hash_run(&mut self) {
        let mut absorbed = 0;
        while self.array.len() + 1 < self.limits.max_array_index {
            let key = TableKey::index(self.array.len() + 1);
            match self.generic.remove(&key) {
                Some(value) => {
                    self.order.remove(&key);
                    self.array.push(value);
                    absorbed += 1;
                }
                None => break,
            }
        }
        if absorbed > 0 {
            tracing::trace!(absorbed, size = self.array.len(), "absorbed hash run into array");
        }
    }
}
