//! Arithmetic and bitwise operations under the numeric promotion rules.
//!
//! Integer pairs stay integer for `+`, `-`, `*`, `//`, `%` (wrapping
//! 64-bit); a float operand lifts the operation to float; `/` and `^`
//! always produce a float. `/` errors on a zero divisor; `//` and `%`
//! error only on a zero integer divisor, while their float paths follow
//! IEEE 754.

use crate::error::RuntimeErrorKind;
use lupine_core::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Mod,
    Pow,
    BAnd,
    BOr,
    BXor,
    Shl,
    Shr,
}

impl ArithOp {
    fn is_bitwise(&self) -> bool {
        matches!(
            self,
            ArithOp::BAnd | ArithOp::BOr | ArithOp::BXor | ArithOp::Shl | ArithOp::Shr
        )
    }
}

/// Perform a binary arithmetic or bitwise operation.
pub fn arith_op(op: ArithOp, a: Value, b: Value) -> Result<Value, RuntimeErrorKind> {
    if op.is_bitwise() {
        return match (a.as_integer(), b.as_integer()) {
            (Some(ia), Some(ib)) => Ok(Value::Integer(bitwise(op, ia, ib))),
            _ => {
                let offender = if a.as_integer().is_none() { a } else { b };
                Err(RuntimeErrorKind::TypeError(format!(
                    "attempt to perform bitwise operation on a {} value",
                    offender.type_name()
                )))
            }
        };
    }

    // Integer fast path; Div and Pow always go through floats.
    if !matches!(op, ArithOp::Div | ArithOp::Pow) {
        if let (Some(ia), Some(ib)) = (a.as_integer(), b.as_integer()) {
            return int_arith(op, ia, ib);
        }
    }

    match (a.as_number(), b.as_number()) {
        (Some(fa), Some(fb)) => float_arith(op, fa, fb),
        _ => {
            let offender = if a.as_number().is_none() { a } else { b };
            Err(RuntimeErrorKind::TypeError(format!(
                "attempt to perform arithmetic on a {} value",
                offender.type_name()
            )))
        }
    }
}

/// Unary minus preserves the numeric tag.
pub fn negate(v: Value) -> Result<Value, RuntimeErrorKind> {
    match v {
        Value::Integer(i) => Ok(Value::Integer(i.wrapping_neg())),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(RuntimeErrorKind::TypeError(format!(
            "attempt to perform arithmetic on a {} value",
            other.type_name()
        ))),
    }
}

/// Bitwise not requires an integer.
pub fn bnot(v: Value) -> Result<Value, RuntimeErrorKind> {
    match v.as_integer() {
        Some(i) => Ok(Value::Integer(!i)),
        None => Err(RuntimeErrorKind::TypeError(format!(
            "attempt to perform bitwise operation on a {} value",
            v.type_name()
        ))),
    }
}

fn int_arith(op: ArithOp, a: i64, b: i64) -> Result<Value, RuntimeErrorKind> {
    let result = match op {
        ArithOp::Add => a.wrapping_add(b),
        ArithOp::Sub => a.wrapping_sub(b),
        ArithOp::Mul => a.wrapping_mul(b),
        ArithOp::IDiv => {
            if b == 0 {
                return Err(RuntimeErrorKind::DivisionByZero);
            }
            floor_div(a, b)
        }
        ArithOp::Mod => {
            if b == 0 {
                return Err(RuntimeErrorKind::DivisionByZero);
            }
            floor_mod(a, b)
        }
        ArithOp::Div | ArithOp::Pow => unreachable!("handled on the float path"),
        _ => unreachable!("bitwise handled separately"),
    };
    Ok(Value::Integer(result))
}

fn float_arith(op: ArithOp, a: f64, b: f64) -> Result<Value, RuntimeErrorKind> {
    let result = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => {
            if b == 0.0 {
                return Err(RuntimeErrorKind::DivisionByZero);
            }
            a / b
        }
        ArithOp::Pow => a.powf(b),
        // Float floor division and modulo by zero follow IEEE 754.
        ArithOp::IDiv => (a / b).floor(),
        ArithOp::Mod => float_mod(a, b),
        _ => unreachable!("bitwise handled separately"),
    };
    Ok(Value::Float(result))
}

/// Integer floor division: rounds toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let d = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r ^ b) < 0 {
        d - 1
    } else {
        d
    }
}

/// Integer modulo with the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && (r ^ b) < 0 {
        r.wrapping_add(b)
    } else {
        r
    }
}

/// Float modulo: `a - floor(a/b)*b`, computed from the truncated remainder
/// to avoid underflow with tiny operands.
fn float_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && ((r > 0.0) != (b > 0.0)) {
        r + b
    } else {
        r
    }
}

/// Left shift. Out-of-range counts (negative or >= 64) produce zero.
fn shift_left(a: i64, b: i64) -> i64 {
    if !(0..64).contains(&b) {
        0
    } else {
        ((a as u64) << b) as i64
    }
}

/// Logical right shift over the unsigned 64-bit view.
fn shift_right(a: i64, b: i64) -> i64 {
    if !(0..64).contains(&b) {
        0
    } else {
        ((a as u64) >> b) as i64
    }
}

fn bitwise(op: ArithOp, a: i64, b: i64) -> i64 {
    match op {
        ArithOp::BAnd => a & b,
        ArithOp::BOr => a | b,
        ArithOp::BXor => a ^ b,
        ArithOp::Shl => shift_left(a, b),
        ArithOp::Shr => shift_right(a, b),
        _ => unreachable!("non-bitwise op"),
    }
}
