//! Runtime errors surfaced to the evaluator

use thiserror::Error;

use super::store::ListHandle;

/// Result type for runtime operations
pub type RtResult<T> = std::result::Result<T, RuntimeError>;

/// Failure of a runtime operation
///
/// The runtime never recovers from these on its own: every failure is
/// reported to the immediate caller, which decides whether the current
/// evaluation aborts or the error is translated into a script-level value.
/// None of them are fatal to the process.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    /// Operation targets an unknown or already-freed list
    #[error("invalid list handle {handle}")]
    InvalidHandle { handle: ListHandle },

    /// The store's cell budget cannot satisfy an allocation
    #[error("out of list memory: {requested} cell(s) requested, {available} available")]
    OutOfMemory { requested: usize, available: usize },

    /// Push attempted on a full list
    #[error("list full: capacity {capacity} reached")]
    CapacityExceeded { capacity: usize },

    /// Pop attempted on a zero-length list
    #[error("pop from empty list")]
    EmptyList,

    /// Get or set outside the live element range
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Malformed argument, e.g. a negative capacity or a truncate beyond
    /// the current length
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Call to a name nothing has registered
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    /// Call with the wrong number of arguments
    #[error("function {name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Argument of the wrong kind
    #[error("type error: expected {expected}, got {got}")]
    Type {
        expected: &'static str,
        got: &'static str,
    },
}

impl RuntimeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        RuntimeError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn unknown_function(name: impl Into<String>) -> Self {
        RuntimeError::UnknownFunction { name: name.into() }
    }

    pub fn arity_mismatch(name: impl Into<String>, expected: usize, got: usize) -> Self {
        RuntimeError::ArityMismatch {
            name: name.into(),
            expected,
            got,
        }
    }

    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        RuntimeError::Type { expected, got }
    }
}
