use thiserror::Error;

/// Errors raised by table operations and by the call mechanism the sort adapter drives.
///
/// Plain reads and writes with valid keys never fail; absent keys read as nil.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LuaError {
    /// Default ordering applied to values that have no natural order between them
    #[error("attempt to compare {lhs} with {rhs}")]
    Compare {
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("table index is nil")]
    IndexIsNil,
    #[error("table index is NaN")]
    IndexIsNaN,
    /// `next` was given a key that is not present in the table
    #[error("invalid key to 'next'")]
    InvalidNextKey,
    #[error("attempt to call a {0} value")]
    NotCallable(&'static str),
    /// Error raised by a called function, message stored verbatim
    #[error("{0}")]
    Runtime(String),
}

impl LuaError {
    pub fn runtime(message: impl Into<String>) -> Self {
        LuaError::Runtime(message.into())
    }
}
