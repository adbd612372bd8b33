// LuaValue - the value representation stored in and used as keys of tables
//
// A single numeric kind (f64) covers both integer and float use; integral
// numbers are what the array segment indexes with.
use std::fmt;

use smol_str::SmolStr;

use super::{FunctionRef, LuaFunction, TableRef, UserdataRef};
use crate::lua_value::lua_table::LuaTable;
use crate::lua_vm::LuaResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuaValueKind {
    Nil,
    Boolean,
    Number,
    String,
    Table,
    Function,
    Userdata,
}

impl LuaValueKind {
    pub fn name(self) -> &'static str {
        match self {
            LuaValueKind::Nil => "nil",
            LuaValueKind::Boolean => "boolean",
            LuaValueKind::Number => "number",
            LuaValueKind::String => "string",
            LuaValueKind::Table => "table",
            LuaValueKind::Function => "function",
            LuaValueKind::Userdata => "userdata",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum LuaValue {
    /// The nil marker; storing it in a table deletes the entry
    #[default]
    Nil,
    Boolean(bool),
    Number(f64),
    String(SmolStr),
    Table(TableRef),
    Function(FunctionRef),
    Userdata(UserdataRef),
}

impl LuaValue {
    pub const TRUE: LuaValue = LuaValue::Boolean(true);
    pub const FALSE: LuaValue = LuaValue::Boolean(false);

    // ============ Constructors ============

    #[inline(always)]
    pub const fn nil() -> Self {
        LuaValue::Nil
    }

    #[inline(always)]
    pub const fn boolean(b: bool) -> Self {
        LuaValue::Boolean(b)
    }

    #[inline(always)]
    pub const fn number(n: f64) -> Self {
        LuaValue::Number(n)
    }

    #[inline(always)]
    pub fn integer(i: i64) -> Self {
        LuaValue::Number(i as f64)
    }

    #[inline]
    pub fn string(s: &str) -> Self {
        LuaValue::String(SmolStr::new(s))
    }

    pub fn table(table: LuaTable) -> Self {
        LuaValue::Table(TableRef::new(table))
    }

    pub fn function<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[LuaValue]) -> LuaResult<LuaValue> + 'static,
    {
        LuaValue::Function(FunctionRef::new(LuaFunction::native(name, func)))
    }

    /// A function whose body lives in the interpreter, identified by its prototype id
    pub fn script_function(name: &str, proto: u64) -> Self {
        LuaValue::Function(FunctionRef::new(LuaFunction::script(name, proto)))
    }

    pub fn userdata<T: 'static>(data: T) -> Self {
        LuaValue::Userdata(UserdataRef::new(data))
    }

    // ============ Type checks ============

    pub fn kind(&self) -> LuaValueKind {
        match self {
            LuaValue::Nil => LuaValueKind::Nil,
            LuaValue::Boolean(_) => LuaValueKind::Boolean,
            LuaValue::Number(_) => LuaValueKind::Number,
            LuaValue::String(_) => LuaValueKind::String,
            LuaValue::Table(_) => LuaValueKind::Table,
            LuaValue::Function(_) => LuaValueKind::Function,
            LuaValue::Userdata(_) => LuaValueKind::Userdata,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    /// Only nil and false are falsy
    #[inline(always)]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LuaValue::Nil | LuaValue::Boolean(false))
    }

    // ============ Accessors ============

    #[inline]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            LuaValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LuaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number as an i64 when it has no fractional part and fits
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LuaValue::Number(n)
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 =>
            {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableRef> {
        match self {
            LuaValue::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for LuaValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LuaValue::Nil, LuaValue::Nil) => true,
            (LuaValue::Boolean(a), LuaValue::Boolean(b)) => a == b,
            (LuaValue::Number(a), LuaValue::Number(b)) => a == b,
            (LuaValue::String(a), LuaValue::String(b)) => a == b,
            (LuaValue::Table(a), LuaValue::Table(b)) => a == b,
            (LuaValue::Function(a), LuaValue::Function(b)) => a == b,
            (LuaValue::Userdata(a), LuaValue::Userdata(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for LuaValue {
    fn from(b: bool) -> Self {
        LuaValue::Boolean(b)
    }
}

impl From<f64> for LuaValue {
    fn from(n: f64) -> Self {
        LuaValue::Number(n)
    }
}

impl From<i64> for LuaValue {
    fn from(i: i64) -> Self {
        LuaValue::integer(i)
    }
}

impl From<&str> for LuaValue {
    fn from(s: &str) -> Self {
        LuaValue::string(s)
    }
}

impl From<SmolStr> for LuaValue {
    fn from(s: SmolStr) -> Self {
        LuaValue::String(s)
    }
}

impl fmt::Display for LuaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaValue::Nil => f.write_str("nil"),
            LuaValue::Boolean(b) => write!(f, "{}", b),
            LuaValue::Number(n) => fmt_number(*n, f),
            LuaValue::String(s) => f.write_str(s),
            LuaValue::Table(t) => write!(f, "table: {:p}", t.as_ptr()),
            LuaValue::Function(func) => write!(f, "function: {}", func.name()),
            LuaValue::Userdata(u) => write!(f, "userdata: {:p}", u.as_ptr()),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // integral values print without a fraction, like Lua's "%.14g"
    if n.fract() == 0.0 && n.abs() < 1e15 {
        let mut buffer = itoa::Buffer::new();
        f.write_str(buffer.format(n as i64))
    } else if n.is_nan() {
        f.write_str(if n.is_sign_negative() { "-nan" } else { "nan" })
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(f, "{}", n)
    }
}
