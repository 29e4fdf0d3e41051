//! Positional parameter binding.

use crate::core::Value;

/// Resolves 1-based `$N` placeholder indices against one call's argument
/// array. The same binder serves SET assignments, WHERE conditions, LIMIT
/// and OFFSET within a single statement.
///
/// A reference past the end of the array resolves to [`Value::Null`] rather
/// than failing the call; the engine favors permissive execution over strict
/// validation.
pub struct ParamBinder<'a> {
    params: &'a [Value],
}

impl<'a> ParamBinder<'a> {
    #[must_use]
    pub const fn new(params: &'a [Value]) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn value(&self, placeholder: usize) -> Value {
        placeholder
            .checked_sub(1)
            .and_then(|idx| self.params.get(idx))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Integer view of a bound parameter, for LIMIT/OFFSET.
    #[must_use]
    pub fn integer(&self, placeholder: usize) -> Option<i64> {
        self.value(placeholder).coerce_int()
    }
}
