use ahash::RandomState;
use std::collections::HashMap;
use std::hash::Hash;

/// Insertion-ordered key set with a reverse index.
///
/// Drives hash-segment enumeration: `keys` holds every live hash key in the
/// order it was first introduced, `position[k] == i` iff `keys[i] == k`.
/// Lookups are O(1); removal is O(n) because later positions shift down.
#[derive(Debug, Clone)]
pub(crate) struct KeyOrder<K> {
    keys: Vec<K>,
    position: HashMap<K, usize, RandomState>,
}

impl<K> Default for KeyOrder<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            position: HashMap::with_hasher(RandomState::new()),
        }
    }
}

impl<K: Hash + Eq + Clone> KeyOrder<K> {
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.position.get(key).copied()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.position.reserve(additional);
    }

    /// Append `key` unless already present. Returns true when it was new.
    pub fn insert(&mut self, key: K) -> bool {
        if self.position.contains_key(&key) {
            return false;
        }
        self.position.insert(key.clone(), self.keys.len());
        self.keys.push(key);
        true
    }

    /// Remove `key`, returning the position it held.
    pub fn remove(&mut self, key: &K) -> Option<usize> {
        let removed = self.position.remove(key)?;
        self.keys.remove(removed);
        for moved in &self.keys[removed..] {
            if let Some(pos) = self.position.get_mut(moved) {
                *pos -= 1;
            }
        }
        Some(removed)
    }

    /// Keep only the keys matching `keep`, preserving their relative order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.keys.retain(|key| keep(key));
        self.position.clear();
        for (i, key) in self.keys.iter().enumerate() {
            self.position.insert(key.clone(), i);
        }
    }

    #[inline]
    pub fn keys_from(&self, start: usize) -> &[K] {
        self.keys.get(start..).unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }
}
