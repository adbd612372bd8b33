use ordered_float::OrderedFloat;
use smol_str::SmolStr;

use super::{FunctionRef, LuaValue, TableRef, UserdataRef};
use crate::lua_vm::{LuaError, LuaResult};

/// Largest integral f64 that still converts to an index exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Hashable form of a table key.
///
/// Nil and NaN have no key form. Numbers use `OrderedFloat`, so `-0.0` and
/// `0.0` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableKey {
    Number(OrderedFloat<f64>),
    String(SmolStr),
    Boolean(bool),
    Table(TableRef),
    Function(FunctionRef),
    Userdata(UserdataRef),
}

impl TableKey {
    pub fn from_value(value: &LuaValue) -> LuaResult<TableKey> {
        match value {
            LuaValue::Nil => Err(LuaError::IndexIsNil),
            LuaValue::Number(n) if n.is_nan() => Err(LuaError::IndexIsNaN),
            LuaValue::Number(n) => Ok(TableKey::Number(OrderedFloat(*n))),
            LuaValue::String(s) => Ok(TableKey::String(s.clone())),
            LuaValue::Boolean(b) => Ok(TableKey::Boolean(*b)),
            LuaValue::Table(t) => Ok(TableKey::Table(t.clone())),
            LuaValue::Function(f) => Ok(TableKey::Function(f.clone())),
            LuaValue::Userdata(u) => Ok(TableKey::Userdata(u.clone())),
        }
    }

    #[inline]
    pub fn index(index: usize) -> TableKey {
        TableKey::Number(OrderedFloat(index as f64))
    }

    pub fn to_value(&self) -> LuaValue {
        match self {
            TableKey::Number(n) => LuaValue::Number(n.0),
            TableKey::String(s) => LuaValue::String(s.clone()),
            TableKey::Boolean(b) => LuaValue::Boolean(*b),
            TableKey::Table(t) => LuaValue::Table(t.clone()),
            TableKey::Function(f) => LuaValue::Function(f.clone()),
            TableKey::Userdata(u) => LuaValue::Userdata(u.clone()),
        }
    }

    /// The array index this key would occupy, independent of any table state
    #[inline]
    pub fn as_positive_integer(&self) -> Option<usize> {
        match self {
            TableKey::Number(n) => is_positive_integer(n.0),
            _ => None,
        }
    }
}

/// `Some(n)` when `n` is integral, at least 1 and exactly representable as an index.
#[inline]
pub fn is_positive_integer(n: f64) -> Option<usize> {
    if n >= 1.0 && n <= MAX_EXACT_INTEGER && n.fract() == 0.0 {
        usize::try_from(n as u64).ok()
    } else {
        None
    }
}
