// Call mechanism boundary
// The table engine never runs script code itself; comparators are invoked through LuaCaller
mod lua_error;
pub mod lua_limits;

pub use crate::lua_vm::lua_error::LuaError;
pub use crate::lua_vm::lua_limits::TableLimits;
use crate::lua_value::{FunctionBody, LuaValue};

pub type LuaResult<T> = Result<T, LuaError>;

/// Synchronous call mechanism supplied by the surrounding runtime.
///
/// `call` runs `func` to completion with `args` and yields exactly one result
/// (nil when the callee returned nothing).
pub trait LuaCaller {
    fn call(&mut self, func: &LuaValue, args: &[LuaValue]) -> LuaResult<LuaValue>;
}

impl<F> LuaCaller for F
where
    F: FnMut(&LuaValue, &[LuaValue]) -> LuaResult<LuaValue>,
{
    #[inline]
    fn call(&mut self, func: &LuaValue, args: &[LuaValue]) -> LuaResult<LuaValue> {
        self(func, args)
    }
}

/// Runs native functions directly; script functions need the interpreter's caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCaller;

impl LuaCaller for NativeCaller {
    fn call(&mut self, func: &LuaValue, args: &[LuaValue]) -> LuaResult<LuaValue> {
        let LuaValue::Function(function) = func else {
            return Err(LuaError::NotCallable(func.type_name()));
        };
        match function.body() {
            FunctionBody::Native(native) => native(args),
            FunctionBody::Script(proto) => Err(LuaError::runtime(format!(
                "cannot call script function '{}' (prototype {}) without an interpreter",
                function.name(),
                proto
            ))),
        }
    }
}
