//! Native function registry
//!
//! The evaluator reaches every runtime facility through named natives
//! with a fixed arity. The same table is how a host adds target-specific
//! builtins (pin toggles, cycle counters, ...) next to the standard
//! library. Lookup failures and arity mismatches come back as typed
//! errors for the evaluator to surface.

use std::collections::HashMap;

use super::engine::Runtime;
use super::error::{RtResult, RuntimeError};
use super::store::ListHandle;
use super::value::Value;

/// A native callable: borrows the runtime and receives already-evaluated
/// arguments
pub type NativeFn = fn(&mut Runtime, &[Value]) -> RtResult<Value>;

#[derive(Clone, Copy)]
struct Native {
    arity: usize,
    func: NativeFn,
}

/// Name -> native function table
pub struct Natives {
    funcs: HashMap<&'static str, Native>,
}

impl Natives {
    /// Empty table, nothing registered
    pub fn new() -> Self {
        Natives {
            funcs: HashMap::new(),
        }
    }

    /// Table with the standard library registered
    pub fn with_defaults() -> Self {
        let mut natives = Natives::new();
        natives.register_defaults();
        natives
    }

    /// Register the standard library: boolean helpers, the bitwise
    /// operators, and the list engine
    pub fn register_defaults(&mut self) {
        self.define("not", 1, native_not);
        self.define("bool", 1, native_bool);
        self.define("band", 2, native_band);
        self.define("bor", 2, native_bor);
        self.define("bxor", 2, native_bxor);

        self.define("list_new", 1, native_list_new);
        self.define("list_dup", 1, native_list_dup);
        self.define("list_free", 1, native_list_free);
        self.define("list_pop", 1, native_list_pop);
        self.define("list_get", 2, native_list_get);
        self.define("list_push", 2, native_list_push);
        self.define("list_push2", 3, native_list_push);
        self.define("list_push3", 4, native_list_push);
        self.define("list_set", 3, native_list_set);
        self.define("list_size", 1, native_list_size);
        self.define("list_truncate", 2, native_list_truncate);
        self.define("list_expand", 2, native_list_expand);
        self.define("list_cat", 2, native_list_cat);
    }

    /// Register or replace a native
    pub fn define(&mut self, name: &'static str, arity: usize, func: NativeFn) {
        self.funcs.insert(name, Native { arity, func });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Registered names, sorted for help output
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.funcs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Look up `name` and invoke it with `args`
    pub fn call(&self, name: &str, rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
        let native = self
            .funcs
            .get(name)
            .ok_or_else(|| RuntimeError::unknown_function(name))?;
        if args.len() != native.arity {
            return Err(RuntimeError::arity_mismatch(name, native.arity, args.len()));
        }
        (native.func)(rt, args)
    }
}

impl Default for Natives {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ---- argument accessors ----

fn int_arg(args: &[Value], at: usize) -> RtResult<i64> {
    args[at]
        .as_int()
        .ok_or_else(|| RuntimeError::type_error("integer", args[at].type_name()))
}

fn list_arg(args: &[Value], at: usize) -> RtResult<ListHandle> {
    args[at]
        .as_list()
        .ok_or_else(|| RuntimeError::type_error("list", args[at].type_name()))
}

// ---- standard library ----

fn native_not(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(rt.logical_not(args[0]))
}

fn native_bool(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(rt.coerce_bool(args[0]))
}

fn native_band(_rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    args[0].bit_and(args[1])
}

fn native_bor(_rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    args[0].bit_or(args[1])
}

fn native_bxor(_rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    args[0].bit_xor(args[1])
}

fn native_list_new(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(Value::List(rt.list_new(int_arg(args, 0)?)?))
}

fn native_list_dup(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(Value::List(rt.duplicate(list_arg(args, 0)?)?))
}

fn native_list_free(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    rt.free(list_arg(args, 0)?)?;
    Ok(Value::Int(0))
}

fn native_list_pop(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    rt.pop(list_arg(args, 0)?)
}

fn native_list_get(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    rt.get(list_arg(args, 0)?, int_arg(args, 1)?)
}

// handles list_push, list_push2 and list_push3: everything after the
// handle is pushed in order, stopping at the first failure
fn native_list_push(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    rt.push_all(list_arg(args, 0)?, &args[1..])?;
    Ok(Value::Int(1))
}

fn native_list_set(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    rt.set(list_arg(args, 0)?, int_arg(args, 1)?, args[2])?;
    Ok(Value::Int(1))
}

fn native_list_size(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(Value::Int(rt.size(list_arg(args, 0)?)?))
}

fn native_list_truncate(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    rt.truncate(list_arg(args, 0)?, int_arg(args, 1)?)?;
    Ok(Value::Int(0))
}

fn native_list_expand(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(Value::List(rt.expand(list_arg(args, 0)?, int_arg(args, 1)?)?))
}

fn native_list_cat(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(Value::List(rt.concat(list_arg(args, 0)?, list_arg(args, 1)?)?))
}
