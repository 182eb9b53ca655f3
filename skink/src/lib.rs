//! Skink Runtime Library
//!
//! The data core of the Skink scripting language: the value model, the
//! caller-managed list store and engine, boolean coercion, and the native
//! function surface an evaluator drives. The parser and expression
//! evaluator are host components; they reach everything here through
//! [`runtime::Natives`] and [`runtime::Runtime`].

pub mod repl;
pub mod runtime;

pub use runtime::{RtResult, RuntimeError};
pub use runtime::{Globals, List, ListHandle, ListStore, Natives, Runtime, Value};
