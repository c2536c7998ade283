//! Shallow Equality
//!
//! The equality primitive used both for props memoization and effect
//! dependency comparison.
//!
//! # Two Levels
//!
//! [`identical`] is the identity rule: primitives compare by value (with
//! `NaN == NaN` and `+0 != -0`), structured values and callables compare by
//! `Arc` pointer identity.
//!
//! [`shallow_equal`] goes exactly one level deeper: two maps are equal when
//! they have the same keys and every value is `identical`; two lists are
//! equal when they have the same length and every element is `identical`.
//! Nested structures are compared by reference, never by contents. This is a
//! deliberate performance/semantics tradeoff: a projection that rebuilds a
//! nested map on every call will defeat memoization, and the fix is to share
//! the nested value, not to deepen the comparison.

use std::sync::Arc;

use super::Value;

/// Identity comparison, one value deep.
///
/// Numbers follow the `Object.is` rules: every NaN is identical to every
/// other NaN, and `+0.0` is not identical to `-0.0`. Lists, maps, and
/// callables are identical only when they are the same shared allocation.
pub fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        }
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(x), Value::List(y)) => Arc::ptr_eq(x, y),
        (Value::Map(x), Value::Map(y)) => Arc::ptr_eq(x, y),
        (Value::Func(x), Value::Func(y)) => Arc::ptr_eq(x, y),
        _ => false,
    }
}

/// Single-level structural equality.
///
/// Identical values are equal. Otherwise only two maps or two lists can be
/// equal: same key set (or length) and `identical` entries. Everything
/// nested is compared by reference.
pub fn shallow_equal(a: &Value, b: &Value) -> bool {
    if identical(a, b) {
        return true;
    }

    match (a, b) {
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, va)| y.get(key).is_some_and(|vb| identical(va, vb)))
        }
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(va, vb)| identical(va, vb))
        }
        _ => false,
    }
}

/// Dependency-list comparison: same length, elementwise `identical`.
///
/// This is `shallow_equal` specialized to the slice form effect dependencies
/// are stored in.
pub fn deps_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| identical(x, y))
}
