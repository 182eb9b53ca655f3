//! Runtime values

use std::fmt;

use serde::Serialize;

use super::error::{RtResult, RuntimeError};
use super::store::ListHandle;

/// Runtime value
///
/// Values are plain `Copy` data: every assignment and every call boundary
/// copies the value itself. A `List` value copies only the handle; the
/// referent stays in the store until it is explicitly freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Value {
    /// Signed machine-word integer
    Int(i64),
    /// Single code unit
    Char(char),
    /// Opaque reference to a list in the store
    List(ListHandle),
}

impl Value {
    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Char(_) => "character",
            Value::List(_) => "list",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<ListHandle> {
        match self {
            Value::List(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Raw numeric view used by the bitwise operators: an integer is
    /// itself, a character is its code point. Handles have no raw bits;
    /// the coercing path is the only boolean view of a list.
    fn raw_bits(self) -> RtResult<i64> {
        match self {
            Value::Int(n) => Ok(n),
            Value::Char(c) => Ok(c as i64),
            Value::List(_) => Err(RuntimeError::type_error("integer", "list")),
        }
    }

    /// Bitwise AND of the raw bits.
    ///
    /// `Int(1).bit_and(Int(2))` is `Int(0)` even though both operands
    /// coerce to true. Callers that want the logical combination must
    /// coerce each operand first; the two paths are intentionally
    /// different operations.
    pub fn bit_and(self, other: Value) -> RtResult<Value> {
        Ok(Value::Int(self.raw_bits()? & other.raw_bits()?))
    }

    /// Bitwise OR of the raw bits
    pub fn bit_or(self, other: Value) -> RtResult<Value> {
        Ok(Value::Int(self.raw_bits()? | other.raw_bits()?))
    }

    /// Bitwise XOR of the raw bits
    pub fn bit_xor(self, other: Value) -> RtResult<Value> {
        Ok(Value::Int(self.raw_bits()? ^ other.raw_bits()?))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::List(handle) => write!(f, "<list {handle}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "integer");
        assert_eq!(Value::Char('a').type_name(), "character");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Int(42).as_char(), None);
        assert_eq!(Value::Char('x').as_char(), Some('x'));
        assert_eq!(Value::Char('x').as_list(), None);
    }

    #[test]
    fn test_bitwise_on_integers() {
        let a = Value::Int(0b1100);
        let b = Value::Int(0b1010);
        assert_eq!(a.bit_and(b).unwrap(), Value::Int(0b1000));
        assert_eq!(a.bit_or(b).unwrap(), Value::Int(0b1110));
        assert_eq!(a.bit_xor(b).unwrap(), Value::Int(0b0110));
    }

    #[test]
    fn test_bitwise_uses_raw_bits_not_truthiness() {
        // 1 and 2 are both non-zero, yet their bitwise AND is zero
        let and = Value::Int(1).bit_and(Value::Int(2)).unwrap();
        assert_eq!(and, Value::Int(0));
    }

    #[test]
    fn test_bitwise_on_characters() {
        // characters participate through their code point
        let and = Value::Char('a').bit_and(Value::Int(0xFF)).unwrap();
        assert_eq!(and, Value::Int('a' as i64));
    }

    #[test]
    fn test_bitwise_rejects_handles() {
        let mut store = crate::runtime::store::ListStore::new();
        let handle = store.allocate(1).unwrap();
        let err = Value::List(handle).bit_and(Value::Int(1)).unwrap_err();
        assert_eq!(err, RuntimeError::type_error("integer", "list"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Int(-3)), "-3");
        assert_eq!(format!("{}", Value::Char('b')), "b");
    }

    #[test]
    fn test_copy_semantics() {
        let a = Value::Int(7);
        let b = a;
        // both bindings stay usable: values are copied, never moved
        assert_eq!(a, b);
    }
}
