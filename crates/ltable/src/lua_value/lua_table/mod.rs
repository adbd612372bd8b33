// LuaTable - hybrid array/hash table
// - Array segment for positive integer keys [1..array.len()], holes are nil slots
// - String map for string keys, generic map for every other key kind
// - Hash keys enumerate in insertion order through KeyOrder
mod key_order;
mod next;
mod resize;
mod sequence;

use std::cell::Cell;
use std::collections::HashMap;

use ahash::RandomState;
use smol_str::SmolStr;

use self::key_order::KeyOrder;
use super::{LuaValue, TableKey, TableRef, is_positive_integer};
use crate::lua_vm::{LuaCaller, LuaError, LuaResult, TableLimits};
use crate::stdlib::sort_table::{ValueSorter, sort};

pub use next::Iter;

/// Lua table implementation
///
/// Routing invariant: a positive integral number key `k` lives in the array
/// segment iff `k <= array.len()`; every other key lives in exactly one of
/// the two hash maps and is registered in `order`.
#[derive(Debug, Clone)]
pub struct LuaTable {
    /// Array segment, `array[0]` holds key 1. Slots past the last occupied one are nil.
    array: Vec<LuaValue>,

    strings: HashMap<SmolStr, LuaValue, RandomState>,

    /// Booleans, references and numbers outside the array segment
    generic: HashMap<TableKey, LuaValue, RandomState>,

    order: KeyOrder<TableKey>,

    /// Set once a `next` traversal crosses from the array into the hash segment
    hash_phase: Cell<bool>,

    metatable: Option<TableRef>,

    limits: TableLimits,
}

impl Default for LuaTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LuaTable {
    /// Create an empty table; storage is allocated on first use
    pub fn new() -> Self {
        Self::with_limits(TableLimits::default())
    }

    /// Create a table with capacity hints for the array and hash segments
    pub fn with_capacity(array_hint: usize, hash_hint: usize) -> Self {
        let mut table = Self::new();
        table.array.reserve_exact(array_hint);
        if hash_hint > 0 {
            table.strings.reserve(hash_hint);
            table.order.reserve(hash_hint);
        }
        table
    }

    /// Create a table with explicit sizing limits, clamped to workable values
    pub fn with_limits(limits: TableLimits) -> Self {
        let limits = limits.clamped();
        Self {
            array: Vec::new(),
            strings: HashMap::with_hasher(RandomState::new()),
            generic: HashMap::with_hasher(RandomState::new()),
            order: KeyOrder::default(),
            hash_phase: Cell::new(false),
            metatable: None,
            limits,
        }
    }

    #[inline]
    pub fn limits(&self) -> &TableLimits {
        &self.limits
    }

    pub fn metatable(&self) -> Option<&TableRef> {
        self.metatable.as_ref()
    }

    /// Replace the metatable, returning the previous one
    pub fn set_metatable(&mut self, metatable: Option<TableRef>) -> Option<TableRef> {
        std::mem::replace(&mut self.metatable, metatable)
    }

    /// Size of the array segment, holes included
    #[inline]
    pub fn array_capacity(&self) -> usize {
        self.array.len()
    }

    /// Number of live entries in the hash segment
    #[inline]
    pub fn hash_len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.array.iter().all(LuaValue::is_nil)
    }

    // ============ Classifier ============

    /// Array slot (1-based) for `n` when it falls inside the current segment
    #[inline]
    fn array_slot(&self, n: f64) -> Option<usize> {
        is_positive_integer(n).filter(|&index| index <= self.array.len())
    }

    /// Whether writing key `n` should place it in the array segment, growing it if needed.
    ///
    /// Eligible keys are positive integers below `max_array_index` and no
    /// farther than `max(2 * array.len(), array_capacity)`; keys beyond that
    /// bound go to the hash segment instead of forcing a huge allocation.
    pub fn is_array_eligible(&self, n: f64) -> Option<usize> {
        let bound = self
            .array
            .len()
            .saturating_mul(2)
            .max(self.limits.array_capacity);
        is_positive_integer(n)
            .filter(|&index| index < self.limits.max_array_index && index <= bound)
    }

    // ============ Raw access ============

    /// Read without metamethods; absent keys, nil and NaN read as nil
    pub fn raw_get(&self, key: &LuaValue) -> LuaValue {
        match key {
            LuaValue::Nil => LuaValue::Nil,
            LuaValue::Number(n) => self.get_number(*n),
            LuaValue::String(s) => self.get_str(s),
            other => match TableKey::from_value(other) {
                Ok(key) => self.generic.get(&key).cloned().unwrap_or_default(),
                Err(_) => LuaValue::Nil,
            },
        }
    }

    #[inline]
    pub fn get_int(&self, key: i64) -> LuaValue {
        self.get_number(key as f64)
    }

    #[inline]
    pub fn get_str(&self, key: &str) -> LuaValue {
        self.strings.get(key).cloned().unwrap_or_default()
    }

    fn get_number(&self, n: f64) -> LuaValue {
        if let Some(index) = self.array_slot(n) {
            return self.array[index - 1].clone();
        }
        if n.is_nan() {
            return LuaValue::Nil;
        }
        self.generic
            .get(&TableKey::Number(n.into()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &LuaValue) -> bool {
        !self.raw_get(key).is_nil()
    }

    /// Write without metamethods. Storing nil removes the key.
    pub fn raw_set(&mut self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        match key {
            LuaValue::Nil => Err(LuaError::IndexIsNil),
            LuaValue::Number(n) if n.is_nan() => Err(LuaError::IndexIsNaN),
            LuaValue::Number(n) => {
                self.set_number(n, value);
                Ok(())
            }
            LuaValue::String(s) => {
                self.set_string(s, value);
                Ok(())
            }
            other => {
                let key = TableKey::from_value(&other)?;
                self.set_generic(key, value);
                Ok(())
            }
        }
    }

    #[inline]
    pub fn set_int(&mut self, key: i64, value: LuaValue) {
        self.set_number(key as f64, value);
    }

    #[inline]
    pub fn set_str(&mut self, key: &str, value: LuaValue) {
        self.set_string(SmolStr::new(key), value);
    }

    /// `n` must not be NaN
    fn set_number(&mut self, n: f64, value: LuaValue) {
        if let Some(index) = self.array_slot(n) {
            self.set_array_slot(index, value);
            return;
        }
        match self.is_array_eligible(n) {
            Some(index) if !value.is_nil() => {
                self.resize(index);
                self.array[index - 1] = value;
            }
            _ => self.set_generic(TableKey::Number(n.into()), value),
        }
    }

    fn set_array_slot(&mut self, index: usize, value: LuaValue) {
        if value.is_nil() {
            let border = self.max_n();
            if index > border {
                return;
            }
            if index == border {
                // every slot after the border is nil, dropping it shrinks the segment
                self.array.remove(index - 1);
                return;
            }
        }
        self.array[index - 1] = value;
    }

    fn set_string(&mut self, key: SmolStr, value: LuaValue) {
        if value.is_nil() {
            if self.strings.remove(&key).is_some() {
                self.order.remove(&TableKey::String(key));
            }
            return;
        }
        if self.strings.capacity() == 0 {
            self.strings.reserve(self.limits.hash_capacity);
        }
        if self.strings.insert(key.clone(), value).is_none() {
            self.order.insert(TableKey::String(key));
        }
    }

    fn set_generic(&mut self, key: TableKey, value: LuaValue) {
        debug_assert!(!matches!(key, TableKey::String(_)));
        if value.is_nil() {
            self.take_generic(&key);
            return;
        }
        if self.generic.capacity() == 0 {
            self.generic.reserve(self.limits.hash_capacity);
        }
        if self.generic.insert(key.clone(), value).is_none() {
            self.order.insert(key);
        }
    }

    /// Remove `key` from the generic map and the insertion order
    fn take_generic(&mut self, key: &TableKey) -> LuaValue {
        match self.generic.remove(key) {
            Some(value) => {
                self.order.remove(key);
                value
            }
            None => LuaValue::Nil,
        }
    }

    /// Look up a hash-segment key in whichever map owns it
    fn hash_get(&self, key: &TableKey) -> Option<&LuaValue> {
        match key {
            TableKey::String(s) => self.strings.get(s),
            other => self.generic.get(other),
        }
    }

    // ============ Sorting ============

    /// Sort the sequence in place.
    ///
    /// A sequence continuing into the hash segment is pulled into the array
    /// and holes are compacted out first. Without a comparator numbers and strings
    /// use their natural order; with one, every comparison goes through
    /// `caller` and a truthy result means "less than". Comparator errors
    /// propagate unchanged and leave the array partially sorted.
    pub fn sort<C: LuaCaller>(
        &mut self,
        comparator: Option<&LuaValue>,
        caller: &mut C,
    ) -> LuaResult<()> {
        let comparator = comparator.filter(|c| !c.is_nil());
        if let Some(c) = comparator {
            if !matches!(c, LuaValue::Function(_)) {
                return Err(LuaError::NotCallable(c.type_name()));
            }
        }
        self.gather_sequence();
        self.array.retain(|v| !v.is_nil());
        let mut sorter = ValueSorter::new(&mut self.array, comparator, caller);
        sort(&mut sorter)
    }
}
