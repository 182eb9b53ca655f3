//! Conversions between character lists and host strings
//!
//! Format templates and other text cross the boundary as lists of
//! characters; the formatted-output facility walks them with `get` and
//! `size`. These helpers build such lists from host strings or bytes and
//! render them back. Lists carry an explicit length, so there is no
//! terminator element.

use super::engine::Runtime;
use super::error::{RtResult, RuntimeError};
use super::store::ListHandle;
use super::value::Value;

/// Allocate a character list holding `text`
pub fn string_to_list(rt: &mut Runtime, text: &str) -> RtResult<ListHandle> {
    let chars: Vec<char> = text.chars().collect();
    let handle = rt.list_new(chars.len() as i64)?;
    for c in chars {
        rt.push(handle, Value::Char(c))?;
    }
    Ok(handle)
}

/// Allocate a character list from raw bytes
pub fn bytes_to_list(rt: &mut Runtime, bytes: &[u8]) -> RtResult<ListHandle> {
    let handle = rt.list_new(bytes.len() as i64)?;
    for &b in bytes {
        rt.push(handle, Value::Char(b as char))?;
    }
    Ok(handle)
}

/// Render a list back to a string. Characters pass through; integers are
/// accepted when they name a valid code point.
pub fn list_to_string(rt: &Runtime, handle: ListHandle) -> RtResult<String> {
    let list = rt.store().resolve(handle)?;
    let mut out = String::with_capacity(list.len());
    for value in list.values() {
        out.push(value_to_char(*value)?);
    }
    Ok(out)
}

fn value_to_char(value: Value) -> RtResult<char> {
    match value {
        Value::Char(c) => Ok(c),
        Value::Int(n) => u32::try_from(n)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::type_error("character", "integer")),
        Value::List(_) => Err(RuntimeError::type_error("character", "list")),
    }
}
