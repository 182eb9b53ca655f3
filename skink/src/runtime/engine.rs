//! The runtime: list engine operations and boolean coercion
//!
//! `Runtime` bundles the list store with the shared global variables and
//! exposes the handle-level operation set the evaluator calls into.
//! Everything here is synchronous and single-threaded: one call frame
//! runs to completion before control returns, and the store is owned by
//! exactly one `Runtime`.
//!
//! Script-facing indices and sizes arrive as `i64` (the script's only
//! integer type) and are range-checked at this boundary.

use super::convention::Globals;
use super::error::{RtResult, RuntimeError};
use super::list::List;
use super::store::{ListHandle, ListStore};
use super::value::Value;

pub struct Runtime {
    store: ListStore,
    globals: Globals,
}

impl Runtime {
    pub fn new() -> Self {
        Runtime {
            store: ListStore::new(),
            globals: Globals::new(),
        }
    }

    /// Runtime whose store is capped at `cell_limit` element cells
    pub fn with_cell_limit(cell_limit: usize) -> Self {
        Runtime {
            store: ListStore::with_cell_limit(cell_limit),
            globals: Globals::new(),
        }
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut Globals {
        &mut self.globals
    }

    // ---- list engine ----

    /// Allocate an empty list. `capacity = 0` is legal: a list with no
    /// headroom, where any push first requires an expand.
    pub fn list_new(&mut self, capacity: i64) -> RtResult<ListHandle> {
        let capacity = non_negative(capacity, "capacity")?;
        self.store.allocate(capacity)
    }

    /// Append one value; capacity is never grown implicitly
    pub fn push(&mut self, handle: ListHandle, value: Value) -> RtResult<()> {
        self.store.resolve_mut(handle)?.push(value)
    }

    /// Sequential single pushes. Stops at the first failure, leaving the
    /// earlier pushes in place.
    pub fn push_all(&mut self, handle: ListHandle, values: &[Value]) -> RtResult<()> {
        let list = self.store.resolve_mut(handle)?;
        for value in values {
            list.push(*value)?;
        }
        Ok(())
    }

    /// Remove and return the last element
    pub fn pop(&mut self, handle: ListHandle) -> RtResult<Value> {
        self.store.resolve_mut(handle)?.pop()
    }

    pub fn get(&self, handle: ListHandle, index: i64) -> RtResult<Value> {
        let list = self.store.resolve(handle)?;
        let index = check_index(index, list.len())?;
        list.get(index)
    }

    pub fn set(&mut self, handle: ListHandle, index: i64, value: Value) -> RtResult<()> {
        let list = self.store.resolve_mut(handle)?;
        let index = check_index(index, list.len())?;
        list.set(index, value)
    }

    /// Logical shrink; capacity is unchanged
    pub fn truncate(&mut self, handle: ListHandle, new_len: i64) -> RtResult<()> {
        let new_len = non_negative(new_len, "length")?;
        self.store.resolve_mut(handle)?.truncate(new_len)
    }

    /// Current length
    pub fn size(&self, handle: ListHandle) -> RtResult<i64> {
        Ok(self.store.resolve(handle)?.len() as i64)
    }

    /// Allocate an independent copy: same capacity, same elements.
    /// Mutating or freeing either list never shows through the other.
    pub fn duplicate(&mut self, handle: ListHandle) -> RtResult<ListHandle> {
        let copy = self.store.resolve(handle)?.duplicate();
        self.store.insert(copy)
    }

    /// Allocate a new list holding the elements of `a` followed by the
    /// elements of `b`, with capacity equal to the combined length.
    /// Neither input is consumed or mutated.
    pub fn concat(&mut self, a: ListHandle, b: ListHandle) -> RtResult<ListHandle> {
        let mut values = Vec::new();
        {
            let first = self.store.resolve(a)?;
            let second = self.store.resolve(b)?;
            values.reserve_exact(first.len() + second.len());
            values.extend_from_slice(first.values());
            values.extend_from_slice(second.values());
        }
        self.store.insert(List::from_values(values))
    }

    /// Replace the list with one that has `additional` more cells of
    /// capacity. The old handle is released here and must not be used
    /// again; callers continue with the returned handle. Growth is by
    /// reallocation, so a failed allocation leaves the original intact.
    pub fn expand(&mut self, handle: ListHandle, additional: i64) -> RtResult<ListHandle> {
        let additional = non_negative(additional, "additional capacity")?;
        let grown = self.store.resolve(handle)?.grown(additional);
        let new_handle = self.store.insert(grown)?;
        self.store.deallocate(handle)?;
        Ok(new_handle)
    }

    /// Release the list. Must be the last operation on this handle.
    pub fn free(&mut self, handle: ListHandle) -> RtResult<()> {
        self.store.deallocate(handle)
    }

    // ---- boolean view ----

    /// Boolean reading of a value: a non-zero integer, a non-NUL
    /// character, or a handle that still resolves. List truthiness is
    /// validity, never emptiness.
    pub fn truthy(&self, value: Value) -> bool {
        match value {
            Value::Int(n) => n != 0,
            Value::Char(c) => c != '\0',
            Value::List(handle) => self.store.is_live(handle),
        }
    }

    /// Normalize any value to the canonical `Int(1)` / `Int(0)`
    pub fn coerce_bool(&self, value: Value) -> Value {
        Value::Int(if self.truthy(value) { 1 } else { 0 })
    }

    pub fn logical_not(&self, value: Value) -> Value {
        Value::Int(if self.truthy(value) { 0 } else { 1 })
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

fn non_negative(value: i64, what: &str) -> RtResult<usize> {
    usize::try_from(value)
        .map_err(|_| RuntimeError::invalid_argument(format!("{what} must be non-negative, got {value}")))
}

fn check_index(index: i64, len: usize) -> RtResult<usize> {
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(RuntimeError::IndexOutOfRange { index, len }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_list(rt: &mut Runtime, chars: &[char]) -> ListHandle {
        let handle = rt.list_new(chars.len() as i64).unwrap();
        for &c in chars {
            rt.push(handle, Value::Char(c)).unwrap();
        }
        handle
    }

    #[test]
    fn test_new_rejects_negative_capacity() {
        let mut rt = Runtime::new();
        assert!(matches!(
            rt.list_new(-1),
            Err(RuntimeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_capacity_bounds_pushes_exactly() {
        let mut rt = Runtime::new();
        for capacity in 0..5 {
            let handle = rt.list_new(capacity).unwrap();
            for n in 0..capacity {
                rt.push(handle, Value::Int(n)).unwrap();
            }
            assert!(matches!(
                rt.push(handle, Value::Int(99)),
                Err(RuntimeError::CapacityExceeded { .. })
            ));
            assert_eq!(rt.size(handle).unwrap(), capacity);
        }
    }

    #[test]
    fn test_push_all_stops_at_first_failure() {
        let mut rt = Runtime::new();
        let handle = rt.list_new(2).unwrap();
        let err = rt
            .push_all(handle, &[Value::Int(1), Value::Int(2), Value::Int(3)])
            .unwrap_err();
        assert_eq!(err, RuntimeError::CapacityExceeded { capacity: 2 });
        // the pushes before the failure persist
        assert_eq!(rt.size(handle).unwrap(), 2);
        assert_eq!(rt.get(handle, 1).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_get_negative_index() {
        let mut rt = Runtime::new();
        let handle = char_list(&mut rt, &['a']);
        assert_eq!(
            rt.get(handle, -1).unwrap_err(),
            RuntimeError::IndexOutOfRange { index: -1, len: 1 }
        );
    }

    #[test]
    fn test_duplicate_non_aliasing_round_trip() {
        let mut rt = Runtime::new();
        let original = char_list(&mut rt, &['x', 'y']);
        let copy = rt.duplicate(original).unwrap();

        assert_eq!(rt.size(copy).unwrap(), 2);
        assert_eq!(rt.get(copy, 0).unwrap(), Value::Char('x'));

        // mutations do not travel between the two
        rt.set(copy, 0, Value::Char('z')).unwrap();
        assert_eq!(rt.get(original, 0).unwrap(), Value::Char('x'));
        rt.set(original, 1, Value::Char('q')).unwrap();
        assert_eq!(rt.get(copy, 1).unwrap(), Value::Char('y'));

        // freeing one never affects the other
        rt.free(original).unwrap();
        assert_eq!(rt.size(copy).unwrap(), 2);
    }

    #[test]
    fn test_concat_order_and_independence() {
        let mut rt = Runtime::new();
        let a = char_list(&mut rt, &['a', 'b']);
        let b = char_list(&mut rt, &['c']);
        let joined = rt.concat(a, b).unwrap();

        assert_eq!(rt.size(joined).unwrap(), 3);
        for (i, expected) in ['a', 'b', 'c'].into_iter().enumerate() {
            assert_eq!(rt.get(joined, i as i64).unwrap(), Value::Char(expected));
        }
        // inputs untouched, result fully independent
        assert_eq!(rt.size(a).unwrap(), 2);
        rt.free(a).unwrap();
        rt.free(b).unwrap();
        assert_eq!(rt.get(joined, 2).unwrap(), Value::Char('c'));
    }

    #[test]
    fn test_concat_list_with_itself() {
        let mut rt = Runtime::new();
        let handle = char_list(&mut rt, &['a', 'b']);
        let doubled = rt.concat(handle, handle).unwrap();
        assert_eq!(rt.size(doubled).unwrap(), 4);
        assert_eq!(rt.get(doubled, 2).unwrap(), Value::Char('a'));
    }

    #[test]
    fn test_expand_supersedes_old_handle() {
        let mut rt = Runtime::new();
        let old = rt.list_new(1).unwrap();
        rt.push(old, Value::Int(1)).unwrap();

        let new = rt.expand(old, 2).unwrap();
        assert_eq!(
            rt.size(old).unwrap_err(),
            RuntimeError::InvalidHandle { handle: old }
        );
        assert_eq!(rt.size(new).unwrap(), 1);
        assert_eq!(rt.get(new, 0).unwrap(), Value::Int(1));

        // exactly the additional headroom became usable
        rt.push(new, Value::Int(2)).unwrap();
        rt.push(new, Value::Int(3)).unwrap();
        assert!(matches!(
            rt.push(new, Value::Int(4)),
            Err(RuntimeError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_expand_failure_leaves_original_intact() {
        let mut rt = Runtime::with_cell_limit(3);
        let handle = rt.list_new(2).unwrap();
        rt.push(handle, Value::Int(1)).unwrap();

        // 2 in use, growing to 4 needs 4 more cells transiently
        assert!(matches!(
            rt.expand(handle, 2),
            Err(RuntimeError::OutOfMemory { .. })
        ));
        assert_eq!(rt.size(handle).unwrap(), 1);
    }

    #[test]
    fn test_every_operation_fails_after_free() {
        let mut rt = Runtime::new();
        let handle = rt.list_new(2).unwrap();
        rt.free(handle).unwrap();

        let invalid = RuntimeError::InvalidHandle { handle };
        assert_eq!(rt.push(handle, Value::Int(1)).unwrap_err(), invalid);
        assert_eq!(rt.pop(handle).unwrap_err(), invalid);
        assert_eq!(rt.get(handle, 0).unwrap_err(), invalid);
        assert_eq!(rt.set(handle, 0, Value::Int(1)).unwrap_err(), invalid);
        assert_eq!(rt.truncate(handle, 0).unwrap_err(), invalid);
        assert_eq!(rt.size(handle).unwrap_err(), invalid);
        assert_eq!(rt.duplicate(handle).unwrap_err(), invalid);
        assert_eq!(rt.expand(handle, 1).unwrap_err(), invalid);
        assert_eq!(rt.free(handle).unwrap_err(), invalid);
    }

    #[test]
    fn test_truthiness_per_variant() {
        let mut rt = Runtime::new();
        assert!(rt.truthy(Value::Int(-5)));
        assert!(!rt.truthy(Value::Int(0)));
        assert!(rt.truthy(Value::Char('a')));
        assert!(!rt.truthy(Value::Char('\0')));

        // a handle is truthy while it resolves, empty or not
        let handle = rt.list_new(0).unwrap();
        assert!(rt.truthy(Value::List(handle)));
        rt.free(handle).unwrap();
        assert!(!rt.truthy(Value::List(handle)));
    }

    #[test]
    fn test_coercion_diverges_from_raw_bitwise() {
        let rt = Runtime::new();
        let first = Value::Int(1);
        let second = Value::Int(2);

        // raw path: 1 & 2 == 0, falsy even though both operands are truthy
        let raw = first.bit_and(second).unwrap();
        assert_eq!(raw, Value::Int(0));
        assert!(!rt.truthy(raw));

        // coerced path: bool(1) & bool(2) == 1
        let coerced = rt
            .coerce_bool(first)
            .bit_and(rt.coerce_bool(second))
            .unwrap();
        assert_eq!(coerced, Value::Int(1));
        assert!(rt.truthy(coerced));
    }

    #[test]
    fn test_logical_not() {
        let rt = Runtime::new();
        assert_eq!(rt.logical_not(Value::Int(5)), Value::Int(0));
        assert_eq!(rt.logical_not(Value::Int(0)), Value::Int(1));
        assert_eq!(rt.logical_not(Value::Char('\0')), Value::Int(1));
    }
}
