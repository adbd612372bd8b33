use crate::lua_value::LuaValue;
use crate::lua_vm::{LuaCaller, LuaError, LuaResult};

/// Ranges this short are finished with insertion sort.
const INSERTION_THRESHOLD: usize = 8;

/// Indexed view a sort algorithm works through.
///
/// `less` may fail (a comparator can raise an error), so the algorithm has
/// to be fallible too; `slice::sort_by` cannot stop early and panics on some
/// inconsistent orderings.
pub trait SortAdapter {
    fn len(&self) -> usize;
    fn swap(&mut self, i: usize, j: usize);
    fn less(&mut self, i: usize, j: usize) -> LuaResult<bool>;
}

/// Sorts a value slice with either the default order or a script comparator
pub struct ValueSorter<'a, C: LuaCaller> {
    values: &'a mut [LuaValue],
    comparator: Option<&'a LuaValue>,
    caller: &'a mut C,
}

impl<'a, C: LuaCaller> ValueSorter<'a, C> {
    pub fn new(
        values: &'a mut [LuaValue],
        comparator: Option<&'a LuaValue>,
        caller: &'a mut C,
    ) -> Self {
        Self {
            values,
            comparator,
            caller,
        }
    }
}

impl<C: LuaCaller> SortAdapter for ValueSorter<'_, C> {
    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
    }

    fn less(&mut self, i: usize, j: usize) -> LuaResult<bool> {
        match self.comparator {
            Some(comparator) => {
                let args = [self.values[i].clone(), self.values[j].clone()];
                let result = self.caller.call(comparator, &args)?;
                Ok(result.is_truthy())
            }
            None => default_less(&self.values[i], &self.values[j]),
        }
    }
}

/// `a < b` for numbers and strings; any other pairing is a compare error
pub fn default_less(a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    match (a, b) {
        (LuaValue::Number(x), LuaValue::Number(y)) => Ok(x < y),
        (LuaValue::String(x), LuaValue::String(y)) => Ok(x.as_bytes() < y.as_bytes()),
        _ => Err(LuaError::Compare {
            lhs: a.type_name(),
            rhs: b.type_name(),
        }),
    }
}

/// Unstable in-place sort driven through `SortAdapter`.
///
/// Quicksort with median-of-three pivots, insertion sort for short ranges.
/// The first error from `less` aborts the sort and is returned; the data is
/// then a permutation of the input in no particular order.
pub fn sort<S: SortAdapter + ?Sized>(data: &mut S) -> LuaResult<()> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }
    tracing::trace!(len, "sorting");
    quicksort(data, 0, len - 1)
}

// Recurses into the smaller partition and loops on the larger one, so the
// stack depth stays logarithmic.
fn quicksort<S: SortAdapter + ?Sized>(data: &mut S, mut lo: usize, mut hi: usize) -> LuaResult<()> {
    while hi > lo {
        if hi - lo < INSERTION_THRESHOLD {
            return insertion_sort(data, lo, hi);
        }
        let pivot = partition(data, lo, hi)?;
        if pivot - lo < hi - pivot {
            if pivot > lo {
                quicksort(data, lo, pivot - 1)?;
            }
            lo = pivot + 1;
        } else {
            quicksort(data, pivot + 1, hi)?;
            if pivot == lo {
                break;
            }
            hi = pivot - 1;
        }
    }
    Ok(())
}

/// Partition `lo..=hi` around a median-of-three pivot and return its final index
fn partition<S: SortAdapter + ?Sized>(data: &mut S, lo: usize, hi: usize) -> LuaResult<usize> {
    let mid = lo + (hi - lo) / 2;
    if data.less(mid, lo)? {
        data.swap(mid, lo);
    }
    if data.less(hi, lo)? {
        data.swap(hi, lo);
    }
    if data.less(hi, mid)? {
        data.swap(hi, mid);
    }
    // pivot parks at hi while the range is scanned
    data.swap(mid, hi);

    let mut store = lo;
    for i in lo..hi {
        if data.less(i, hi)? {
            data.swap(i, store);
            store += 1;
        }
    }
    data.swap(store, hi);
    Ok(store)
}

fn insertion_sort<S: SortAdapter + ?Sized>(data: &mut S, lo: usize, hi: usize) -> LuaResult<()> {
    for i in lo + 1..=hi {
        let mut j = i;
        while j > lo && data.less(j, j - 1)? {
            data.swap(j, j - 1);
            j -= 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua_vm::NativeCaller;

    struct Ints(Vec<i64>);

    impl SortAdapter for Ints {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn swap(&mut self, i: usize, j: usize) {
            self.0.swap(i, j);
        }

        fn less(&mut self, i: usize, j: usize) -> LuaResult<bool> {
            Ok(self.0[i] < self.0[j])
        }
    }

    /// Claims every pair is ordered both ways
    struct Liar(Vec<i64>);

    impl SortAdapter for Liar {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn swap(&mut self, i: usize, j: usize) {
            self.0.swap(i, j);
        }

        fn less(&mut self, _: usize, _: usize) -> LuaResult<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_sort_ints() {
        let mut short = Ints(vec![4, 5, 6, 3, 2, 1]);
        sort(&mut short).unwrap();
        assert_eq!(short.0, vec![1, 2, 3, 4, 5, 6]);

        let input: Vec<i64> = (0..200).map(|i| (i * 37) % 101).collect();
        let mut expected = input.clone();
        expected.sort();
        let mut long = Ints(input);
        sort(&mut long).unwrap();
        assert_eq!(long.0, expected);
    }

    #[test]
    fn test_inconsistent_order_keeps_elements() {
        let mut data = Liar((0..64).collect());
        sort(&mut data).unwrap();
        let mut seen = data.0.clone();
        seen.sort();
        assert_eq!(seen, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_default_less() {
        assert_eq!(default_less(&LuaValue::integer(1), &LuaValue::integer(2)), Ok(true));
        assert_eq!(default_less(&LuaValue::string("b"), &LuaValue::string("a")), Ok(false));
        assert_eq!(
            default_less(&LuaValue::integer(1), &LuaValue::string("a")),
            Err(LuaError::Compare {
                lhs: "number",
                rhs: "string"
            })
        );
    }

    #[test]
    fn test_value_sorter_with_comparator() {
        let greater = LuaValue::function("gt", |args| {
            Ok(LuaValue::boolean(args[0].as_number() > args[1].as_number()))
        });
        let mut values: Vec<LuaValue> = [3, 1, 2].into_iter().map(LuaValue::integer).collect();
        let mut caller = NativeCaller;
        let mut sorter = ValueSorter::new(&mut values, Some(&greater), &mut caller);
        sort(&mut sorter).unwrap();
        let sorted: Vec<_> = values.iter().filter_map(LuaValue::as_integer).collect();
        assert_eq!(sorted, vec![3, 2, 1]);
    }
}
