//! Equality and ordering.
//!
//! Equality requires matching tags, so `42 ~= 42.0`. Ordering accepts two
//! numbers (mixed tags compare through float promotion) or two strings
//! (byte-wise lexicographic); anything else is a type error.

use crate::error::RuntimeErrorKind;
use lupine_core::string::StringInterner;
use lupine_core::value::Value;

/// Language equality. `Value`'s `PartialEq` already implements the
/// contract: tags first, strings by interned id, NaN unequal to itself.
pub fn values_equal(a: Value, b: Value) -> bool {
    a == b
}

pub fn less_than(
    a: Value,
    b: Value,
    strings: &StringInterner,
) -> Result<bool, RuntimeErrorKind> {
    // Same-tag integer compare stays exact.
    if let (Some(ia), Some(ib)) = (a.as_integer(), b.as_integer()) {
        return Ok(ia < ib);
    }
    if let (Some(fa), Some(fb)) = (a.as_number(), b.as_number()) {
        return Ok(fa < fb);
    }
    if let (Some(sa), Some(sb)) = (a.as_string_id(), b.as_string_id()) {
        return Ok(strings.get_bytes(sa) < strings.get_bytes(sb));
    }
    Err(compare_error(a, b))
}

pub fn less_equal(
    a: Value,
    b: Value,
    strings: &StringInterner,
) -> Result<bool, RuntimeErrorKind> {
    if let (Some(ia), Some(ib)) = (a.as_integer(), b.as_integer()) {
        return Ok(ia <= ib);
    }
    if let (Some(fa), Some(fb)) = (a.as_number(), b.as_number()) {
        return Ok(fa <= fb);
    }
    if let (Some(sa), Some(sb)) = (a.as_string_id(), b.as_string_id()) {
        return Ok(strings.get_bytes(sa) <= strings.get_bytes(sb));
    }
    Err(compare_error(a, b))
}

fn compare_error(a: Value, b: Value) -> RuntimeErrorKind {
    let (ta, tb) = (a.type_name(), b.type_name());
    if ta == tb {
        RuntimeErrorKind::TypeError(format!("attempt to compare two {ta} values"))
    } else {
        RuntimeErrorKind::TypeError(format!("attempt to compare {ta} with {tb}"))
    }
}
