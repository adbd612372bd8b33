// Sequence operations: border, append, positional insert/remove
use super::LuaTable;
use crate::lua_value::{LuaValue, TableKey};

impl LuaTable {
    /// Length without `__len`: a border of the table.
    ///
    /// Scans the array segment from its end for the last occupied slot. When
    /// the array is full the run may continue in the hash segment, which is
    /// looked up key by key. With holes any border may be reported, not
    /// necessarily the highest index.
    pub fn len(&self) -> usize {
        let border = self.max_n();
        if border < self.array.len() || self.generic.is_empty() {
            return border;
        }
        let mut border = border;
        while self.generic.contains_key(&TableKey::index(border + 1)) {
            border += 1;
        }
        border
    }

    /// Highest occupied array index, 0 when the array segment holds nothing
    pub fn max_n(&self) -> usize {
        self.array
            .iter()
            .rposition(|v| !v.is_nil())
            .map_or(0, |i| i + 1)
    }

    /// Allocate the default array segment when there is none yet
    fn ensure_array(&mut self) {
        if self.array.is_empty() {
            self.resize(1);
        }
    }

    #[inline]
    fn tail_taken(&self) -> bool {
        self.array.last().is_some_and(|v| !v.is_nil())
    }

    /// Pull a sequence that continues past a full array out of the hash
    /// segment, so positional operations see every element `len` counts.
    pub(crate) fn gather_sequence(&mut self) {
        if self.tail_taken() {
            self.absorb_hash_run();
        }
    }

    /// Append after the last occupied element. Appending nil does nothing.
    ///
    /// Reuses the first hole after the last occupied slot; the array only
    /// grows (doubling through the resize engine) when its tail slot is taken.
    pub fn append(&mut self, value: LuaValue) {
        if value.is_nil() {
            return;
        }
        self.ensure_array();

        if self.tail_taken() {
            let position = self.len() + 1;
            self.set_number(position as f64, value);
        } else {
            let index = self.max_n();
            self.array[index] = value;
        }
    }

    /// Insert `value` at `position`, shifting later sequence entries up by one.
    ///
    /// Positions past the sequence are plain integer writes; positions `<= 0`
    /// are stored under that literal number key.
    pub fn insert(&mut self, position: i64, value: LuaValue) {
        self.ensure_array();
        if position <= 0 {
            self.set_generic(TableKey::Number((position as f64).into()), value);
            return;
        }
        self.gather_sequence();
        if position > self.array.len() as i64 {
            self.set_int(position, value);
            return;
        }

        let index = position as usize - 1;
        // a nil tail slot absorbs the shift, a full array grows by one
        if self.tail_taken() {
            self.array.push(LuaValue::Nil);
        }
        self.array[index..].rotate_right(1);
        self.array[index] = value;
    }

    /// Remove and return the element at `position`.
    ///
    /// A sequence that runs on into the hash segment is first pulled into
    /// the array, then:
    /// - past the array segment: deletes the integer key from the hash segment
    /// - `<= 0`: removes the last occupied array element
    /// - the final slot: pops it
    /// - otherwise: removes the slot and shifts later entries down
    ///
    /// The array segment shrinks by one slot whenever an array slot is removed.
    pub fn remove(&mut self, position: i64) -> LuaValue {
        self.gather_sequence();
        let size = self.array.len();
        if position > size as i64 {
            return self.take_generic(&TableKey::Number((position as f64).into()));
        }
        if size == 0 {
            return LuaValue::Nil;
        }
        if position <= 0 {
            return match self.max_n() {
                0 => LuaValue::Nil,
                border => self.array.remove(border - 1),
            };
        }
        if position as usize == size {
            return self.array.pop().unwrap_or_default();
        }
        self.array.remove(position as usize - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua_vm::TableLimits;

    #[test]
    fn test_len_follows_hash_run() {
        let mut table = LuaTable::with_limits(TableLimits::default().with_array_capacity(4));
        for i in (5..=9).rev() {
            table.set_int(i, LuaValue::TRUE);
        }
        for i in 1..=4 {
            table.set_int(i, LuaValue::TRUE);
        }
        assert_eq!(table.array_capacity(), 4);
        assert_eq!(table.max_n(), 4);
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_append_reuses_trailing_hole() {
        let mut table = LuaTable::new();
        table.append(LuaValue::integer(1));
        table.append(LuaValue::integer(2));
        let capacity = table.array_capacity();
        table.set_int(2, LuaValue::Nil);
        table.append(LuaValue::integer(3));
        assert_eq!(table.get_int(2), LuaValue::integer(3));
        assert_eq!(table.array_capacity(), capacity - 1);
    }

    #[test]
    fn test_append_doubles_when_tail_taken() {
        let mut table = LuaTable::with_limits(TableLimits::default().with_array_capacity(4));
        for i in 1..=4 {
            table.append(LuaValue::integer(i));
        }
        assert_eq!(table.array_capacity(), 4);
        table.append(LuaValue::integer(5));
        assert_eq!(table.array_capacity(), 8);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_append_continues_after_hash_run() {
        let mut table = LuaTable::with_limits(TableLimits::default().with_array_capacity(2));
        table.set_int(3, LuaValue::integer(3));
        table.set_int(1, LuaValue::integer(1));
        table.set_int(2, LuaValue::integer(2));
        assert_eq!(table.array_capacity(), 2);
        assert_eq!(table.len(), 3);

        table.append(LuaValue::integer(4));
        assert_eq!(table.len(), 4);
        assert_eq!(table.get_int(3), LuaValue::integer(3));
        assert_eq!(table.get_int(4), LuaValue::integer(4));
        assert_eq!(table.hash_len(), 0);
    }

    #[test]
    fn test_insert_absorbs_hash_run() {
        let mut table = LuaTable::with_limits(TableLimits::default().with_array_capacity(2));
        table.set_int(3, LuaValue::integer(3));
        table.set_int(1, LuaValue::integer(1));
        table.set_int(2, LuaValue::integer(2));

        table.insert(1, LuaValue::integer(0));
        for i in 0..=3 {
            assert_eq!(table.get_int(i + 1), LuaValue::integer(i));
        }
        assert_eq!(table.hash_len(), 0);
        assert_eq!(table.len(), 4);
    }

    /// 1..=32 fill the default array, 33..=last stay in the hash segment
    fn split_sequence(last: i64) -> LuaTable {
        let mut table = LuaTable::new();
        for i in 33..=last {
            table.set_int(i, LuaValue::integer(i));
        }
        for i in 1..=32 {
            table.set_int(i, LuaValue::integer(i));
        }
        assert_eq!(table.array_capacity(), 32);
        assert_eq!(table.hash_len(), (last - 32) as usize);
        table
    }

    #[test]
    fn test_remove_shifts_hash_run() {
        let mut table = split_sequence(40);
        assert_eq!(table.len(), 40);

        assert_eq!(table.remove(1), LuaValue::integer(1));
        assert_eq!(table.len(), 39);
        for i in 1..=39 {
            assert_eq!(table.get_int(i), LuaValue::integer(i + 1));
        }
        assert_eq!(table.get_int(40), LuaValue::Nil);
        assert_eq!(table.hash_len(), 0);

        let mut table = split_sequence(40);
        assert_eq!(table.remove(0), LuaValue::integer(40));
        assert_eq!(table.len(), 39);
    }

    #[test]
    fn test_insert_inside_hash_run() {
        let mut table = split_sequence(40);
        table.insert(35, LuaValue::integer(0));
        assert_eq!(table.len(), 41);
        assert_eq!(table.get_int(34), LuaValue::integer(34));
        assert_eq!(table.get_int(35), LuaValue::integer(0));
        assert_eq!(table.get_int(36), LuaValue::integer(35));
        assert_eq!(table.get_int(41), LuaValue::integer(40));
    }

    #[test]
    fn test_clearing_tail_keeps_hash_run_in_place() {
        let mut table = split_sequence(40);
        table.set_int(32, LuaValue::Nil);
        assert_eq!(table.len(), 31);
        assert_eq!(table.get_int(32), LuaValue::Nil);
        assert_eq!(table.get_int(33), LuaValue::integer(33));
        assert_eq!(table.hash_len(), 8);
    }

    #[test]
    fn test_remove_hash_key_returns_value() {
        let mut table = LuaTable::new();
        table.append(LuaValue::TRUE);
        table.set_int(1000, LuaValue::string("far"));
        let capacity = table.array_capacity();
        assert_eq!(table.remove(1000), LuaValue::string("far"));
        assert_eq!(table.get_int(1000), LuaValue::Nil);
        assert_eq!(table.array_capacity(), capacity);
        assert_eq!(table.hash_len(), 0);
    }

    #[test]
    fn test_remove_on_empty_table() {
        let mut table = LuaTable::new();
        assert_eq!(table.remove(0), LuaValue::Nil);
        assert_eq!(table.remove(-1), LuaValue::Nil);
        assert_eq!(table.remove(3), LuaValue::Nil);
    }
}
