// Values, keys and the reference types tables hold
// Reference types compare and hash by identity, like the runtime's GC objects
pub(crate) mod lua_table;
mod lua_value;
mod table_key;

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use smol_str::SmolStr;

use crate::lua_vm::LuaResult;
pub use lua_table::{Iter, LuaTable};
pub use lua_value::{LuaValue, LuaValueKind};
pub use table_key::{TableKey, is_positive_integer};

/// Shared handle to a table, used when a table is stored as a value or key
#[derive(Clone)]
pub struct TableRef(Rc<RefCell<LuaTable>>);

impl TableRef {
    pub fn new(table: LuaTable) -> Self {
        TableRef(Rc::new(RefCell::new(table)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, LuaTable> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, LuaTable> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const RefCell<LuaTable> {
        Rc::as_ptr(&self.0)
    }
}

impl PartialEq for TableRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TableRef {}

impl Hash for TableRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.as_ptr(), state)
    }
}

impl fmt::Debug for TableRef {
    // tables may reference themselves, only the identity is printed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table: {:p}", self.as_ptr())
    }
}

pub type NativeFn = dyn Fn(&[LuaValue]) -> LuaResult<LuaValue>;

pub enum FunctionBody {
    Native(Box<NativeFn>),
    /// Opaque prototype id, only the interpreter's caller can run it
    Script(u64),
}

pub struct LuaFunction {
    name: SmolStr,
    body: FunctionBody,
}

impl LuaFunction {
    pub fn native<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[LuaValue]) -> LuaResult<LuaValue> + 'static,
    {
        Self {
            name: SmolStr::new(name),
            body: FunctionBody::Native(Box::new(func)),
        }
    }

    pub fn script(name: &str, proto: u64) -> Self {
        Self {
            name: SmolStr::new(name),
            body: FunctionBody::Script(proto),
        }
    }
}

#[derive(Clone)]
pub struct FunctionRef(Rc<LuaFunction>);

impl FunctionRef {
    pub fn new(function: LuaFunction) -> Self {
        FunctionRef(Rc::new(function))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn body(&self) -> &FunctionBody {
        &self.0.body
    }

    #[inline]
    pub fn as_ptr(&self) -> *const LuaFunction {
        Rc::as_ptr(&self.0)
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for FunctionRef {}

impl Hash for FunctionRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.as_ptr(), state)
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function: {} ({:p})", self.name(), self.as_ptr())
    }
}

/// Host data exposed to scripts, opaque to the table engine
#[derive(Clone)]
pub struct UserdataRef(Rc<dyn Any>);

impl UserdataRef {
    pub fn new<T: 'static>(data: T) -> Self {
        UserdataRef(Rc::new(data))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for UserdataRef {
    fn eq(&self, other: &Self) -> bool {
        self.as_ptr() == other.as_ptr()
    }
}

impl Eq for UserdataRef {}

impl Hash for UserdataRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.as_ptr(), state)
    }
}

impl fmt::Debug for UserdataRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "userdata: {:p}", self.as_ptr())
    }
}
