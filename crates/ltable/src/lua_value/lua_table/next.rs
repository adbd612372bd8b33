// Enumeration: stateful `next`, borrowing iterator, eager for_each
// Order is occupied array slots ascending, then hash keys in insertion order
use std::iter::Enumerate;
use std::slice;

use super::LuaTable;
use crate::lua_value::{LuaValue, TableKey};
use crate::lua_vm::{LuaError, LuaResult};

impl LuaTable {
    /// Successor of `key` in traversal order, `None` once exhausted.
    ///
    /// A nil key starts a new traversal. Keys that are neither array indices
    /// nor live hash keys fail with `InvalidNextKey`.
    ///
    /// The hash-phase flag is shared by every traversal of the table. Once it
    /// is set, an array index that has no hash entry still resumes the array
    /// scan instead of failing, so a traversal interleaved with another one
    /// that already reached the hash segment keeps going.
    pub fn next(&self, key: &LuaValue) -> LuaResult<Option<(LuaValue, LuaValue)>> {
        if key.is_nil() {
            self.hash_phase.set(false);
            return Ok(self.array_entry_from(0));
        }

        let array_index = match key {
            LuaValue::Number(n) => self.array_slot(*n),
            _ => None,
        };

        // once in the hash phase, hash positions win over array positions
        if self.hash_phase.get() || array_index.is_none() {
            let hash_key = TableKey::from_value(key).map_err(|_| LuaError::InvalidNextKey)?;
            if let Some(position) = self.order.position(&hash_key) {
                self.hash_phase.set(true);
                return Ok(self.hash_entry_from(position + 1));
            }
        }

        match array_index {
            Some(index) => Ok(self.array_entry_from(index)),
            None => Err(LuaError::InvalidNextKey),
        }
    }

    /// First occupied array slot at or after the 0-based `start`, falling
    /// through to the hash segment when the array is exhausted
    fn array_entry_from(&self, start: usize) -> Option<(LuaValue, LuaValue)> {
        let slots = self.array.get(start..).unwrap_or(&[]);
        if let Some(offset) = slots.iter().position(|v| !v.is_nil()) {
            let index = start + offset;
            return Some((
                LuaValue::integer(index as i64 + 1),
                self.array[index].clone(),
            ));
        }
        self.hash_phase.set(true);
        self.hash_entry_from(0)
    }

    fn hash_entry_from(&self, start: usize) -> Option<(LuaValue, LuaValue)> {
        self.order.keys_from(start).iter().find_map(|key| {
            self.hash_get(key)
                .filter(|v| !v.is_nil())
                .map(|v| (key.to_value(), v.clone()))
        })
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            array: self.array.iter().enumerate(),
            keys: self.order.iter(),
        }
    }

    /// Visit every live entry in traversal order
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&LuaValue, &LuaValue),
    {
        for (key, value) in self.iter() {
            f(&key, value);
        }
    }
}

/// Borrowing iterator over a table's live entries.
///
/// Yields the same sequence as a `next` traversal without touching the
/// table's traversal state.
pub struct Iter<'a> {
    table: &'a LuaTable,
    array: Enumerate<slice::Iter<'a, LuaValue>>,
    keys: slice::Iter<'a, TableKey>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (LuaValue, &'a LuaValue);

    fn next(&mut self) -> Option<Self::Item> {
        for (i, value) in self.array.by_ref() {
            if !value.is_nil() {
                return Some((LuaValue::integer(i as i64 + 1), value));
            }
        }
        let table = self.table;
        self.keys.by_ref().find_map(|key| {
            table
                .hash_get(key)
                .filter(|v| !v.is_nil())
                .map(|v| (key.to_value(), v))
        })
    }
}
