// Lua table engine
// Hybrid array/hash tables with insertion-ordered traversal, sequence ops and a sort adapter

#[cfg(test)]
mod test;

pub mod lua_value;
pub mod lua_vm;
pub mod stdlib;

pub use lua_value::{
    FunctionBody, FunctionRef, LuaFunction, LuaTable, LuaValue, LuaValueKind, TableKey, TableRef,
    UserdataRef,
};
pub use lua_vm::{LuaCaller, LuaError, LuaResult, NativeCaller, TableLimits};
