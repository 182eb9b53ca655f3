//! Shared mutable state for proc-style calls
//!
//! Skink supports two calling styles. A `func` invocation gets an
//! isolated parameter/local scope from the evaluator: arguments arrive as
//! copies (a list argument copies the handle, so the callee mutates the
//! shared referent while the caller's other bindings stay untouchable)
//! and the result comes back by value. A `proc` has no scope of its own:
//! parameters and results are ordinary shared globals, the zero-overhead
//! convention for targets where frame allocation costs too much.
//!
//! Recursive procs are only correct when the caller saves the variables
//! it still needs before a nested invocation and restores them after.
//! That discipline is deliberately explicit here: [`Globals::save`] and
//! [`Globals::restore`] are named operations instead of implicit
//! shadowing, so every clobber point is visible in the calling code.

use std::collections::HashMap;

use super::value::Value;

/// The global variable table every proc invocation shares
#[derive(Debug, Default)]
pub struct Globals {
    vars: HashMap<String, Value>,
}

impl Globals {
    pub fn new() -> Self {
        Globals {
            vars: HashMap::new(),
        }
    }

    /// Define or overwrite a variable
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.vars.get(name).copied()
    }

    /// Update an existing variable. Returns false if it was never defined.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Snapshot the named variables before a nested proc call
    pub fn save(&self, names: &[&str]) -> SavedVars {
        SavedVars {
            entries: names
                .iter()
                .map(|&name| (name.to_string(), self.vars.get(name).copied()))
                .collect(),
        }
    }

    /// Put a snapshot back, undoing whatever the nested call clobbered.
    /// A variable that did not exist at save time is removed again.
    pub fn restore(&mut self, saved: SavedVars) {
        for (name, value) in saved.entries {
            match value {
                Some(value) => {
                    self.vars.insert(name, value);
                }
                None => {
                    self.vars.remove(&name);
                }
            }
        }
    }
}

/// Caller-save snapshot of a set of globals
#[derive(Debug, Clone)]
pub struct SavedVars {
    entries: Vec<(String, Option<Value>)>,
}

impl SavedVars {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
