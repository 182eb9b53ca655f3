//! Runtime core: values, list storage, coercion, and calling-convention
//! support

pub mod convention;
pub mod convert;
pub mod engine;
pub mod error;
pub mod list;
pub mod natives;
pub mod store;
pub mod value;

pub use convention::{Globals, SavedVars};
pub use engine::Runtime;
pub use error::{RtResult, RuntimeError};
pub use list::List;
pub use natives::{NativeFn, Natives};
pub use store::{ListHandle, ListStore, StoreStats};
pub use value::Value;
