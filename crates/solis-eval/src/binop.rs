//! Binary operator semantics.
//!
//! Grounded on `Interpreter::evalBinOp`'s numeric promotion rules (`Int` /
//! `BigInt` mix widens to `BigInt`; same-width pairs stay put) and its
//! division/modulo-by-zero checks. The original's per-operator coverage was
//! inconsistent (`+` handled `Float`/`Float`, `-`/`*` didn't; `>=` skipped
//! the `BigInt` combinations `<`/`>`/`<=` covered) -- normalized here to the
//! symmetric rule the language is documented to have (`Int/Int -> Int`,
//! `BigInt` widening, `Float/Float -> Float`, uniformly across every
//! arithmetic and comparison operator).

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::Zero;
use solis_common::SourceLocation;
use solis_errors::{taxonomy, SolisError};

use crate::value::Value;

pub fn eval_binop(op: &str, left: Value, right: Value, location: SourceLocation) -> Result<Value, SolisError> {
    match op {
        "+" | "-" | "*" | "/" | "%" => numeric_arith(op, left, right, location),
        "==" | "!=" | "<" | ">" | "<=" | ">=" => compare(op, left, right, location),
        "++" => concat(left, right, location),
        "::" => cons(left, right, location),
        "&&" => logical(op, left, right, location, |a, b| a && b),
        "||" => logical(op, left, right, location, |a, b| a || b),
        other => Err(taxonomy::unsupported_operator(other, left.kind(), right.kind(), location)),
    }
}

enum Num {
    Int(i64),
    BigInt(BigInt),
    Float(f64),
}

fn as_num(v: &Value) -> Option<Num> {
    match v {
        Value::Int(i) => Some(Num::Int(*i)),
        Value::BigInt(b) => Some(Num::BigInt(b.clone())),
        Value::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

fn numeric_arith(op: &str, left: Value, right: Value, location: SourceLocation) -> Result<Value, SolisError> {
    let (lk, rk) = (left.kind(), right.kind());
    let (Some(l), Some(r)) = (as_num(&left), as_num(&right)) else {
        return Err(taxonomy::unsupported_operator(op, lk, rk, location));
    };
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => int_arith(op, a, b, location),
        (Num::Float(a), Num::Float(b)) => float_arith(op, a, b, location),
        (Num::Int(a), Num::BigInt(b)) => bigint_arith(op, BigInt::from(a), b, location),
        (Num::BigInt(a), Num::Int(b)) => bigint_arith(op, a, BigInt::from(b), location),
        (Num::BigInt(a), Num::BigInt(b)) => bigint_arith(op, a, b, location),
        _ => Err(taxonomy::unsupported_operator(op, lk, rk, location)),
    }
}

fn int_arith(op: &str, a: i64, b: i64, location: SourceLocation) -> Result<Value, SolisError> {
    Ok(match op {
        "+" => Value::Int(a + b),
        "-" => Value::Int(a - b),
        "*" => Value::Int(a * b),
        "/" => {
            if b == 0 {
                return Err(taxonomy::division_by_zero(location));
            }
            Value::Int(a / b)
        }
        "%" => {
            if b == 0 {
                return Err(taxonomy::division_by_zero(location));
            }
            Value::Int(a % b)
        }
        _ => unreachable!("numeric_arith only dispatches +-*/%"),
    })
}

fn float_arith(op: &str, a: f64, b: f64, location: SourceLocation) -> Result<Value, SolisError> {
    Ok(match op {
        "+" => Value::Float(a + b),
        "-" => Value::Float(a - b),
        "*" => Value::Float(a * b),
        "/" => {
            if b == 0.0 {
                return Err(taxonomy::division_by_zero(location));
            }
            Value::Float(a / b)
        }
        "%" => {
            if b == 0.0 {
                return Err(taxonomy::division_by_zero(location));
            }
            Value::Float(a % b)
        }
        _ => unreachable!("numeric_arith only dispatches +-*/%"),
    })
}

fn bigint_arith(op: &str, a: BigInt, b: BigInt, location: SourceLocation) -> Result<Value, SolisError> {
    Ok(match op {
        "+" => Value::BigInt(a + b),
        "-" => Value::BigInt(a - b),
        "*" => Value::BigInt(a * b),
        "/" => {
            if b.is_zero() {
                return Err(taxonomy::division_by_zero(location));
            }
            Value::BigInt(a / b)
        }
        "%" => {
            if b.is_zero() {
                return Err(taxonomy::division_by_zero(location));
            }
            Value::BigInt(a % b)
        }
        _ => unreachable!("numeric_arith only dispatches +-*/%"),
    })
}

fn numeric_cmp(l: Num, r: Num) -> Option<Ordering> {
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => a.partial_cmp(&b),
        (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
        (Num::Int(a), Num::BigInt(b)) => BigInt::from(a).partial_cmp(&b),
        (Num::BigInt(a), Num::Int(b)) => a.partial_cmp(&BigInt::from(b)),
        (Num::BigInt(a), Num::BigInt(b)) => a.partial_cmp(&b),
        _ => None,
    }
}

fn compare(op: &str, left: Value, right: Value, location: SourceLocation) -> Result<Value, SolisError> {
    let (lk, rk) = (left.kind(), right.kind());
    if let (Some(l), Some(r)) = (as_num(&left), as_num(&right)) {
        let Some(ordering) = numeric_cmp(l, r) else {
            return Err(taxonomy::unsupported_operator(op, lk, rk, location));
        };
        return Ok(Value::Bool(match op {
            "==" => ordering == Ordering::Equal,
            "!=" => ordering != Ordering::Equal,
            "<" => ordering == Ordering::Less,
            ">" => ordering == Ordering::Greater,
            "<=" => ordering != Ordering::Greater,
            ">=" => ordering != Ordering::Less,
            _ => unreachable!("compare only dispatches relational operators"),
        }));
    }

    match (op, &left, &right) {
        ("==", Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a == b)),
        ("!=", Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a != b)),
        ("==", Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
        ("!=", Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a != b)),
        _ => Err(taxonomy::unsupported_operator(op, lk, rk, location)),
    }
}

fn concat(left: Value, right: Value, location: SourceLocation) -> Result<Value, SolisError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => {
            let mut elements = (*a).clone();
            elements.extend((*b).iter().cloned());
            Ok(Value::list(elements))
        }
        (a, b) => Err(taxonomy::unsupported_operator("++", a.kind(), b.kind(), location)),
    }
}

fn cons(left: Value, right: Value, location: SourceLocation) -> Result<Value, SolisError> {
    match right {
        Value::List(elements) => {
            let mut result = Vec::with_capacity(elements.len() + 1);
            result.push(left);
            result.extend((*elements).iter().cloned());
            Ok(Value::list(result))
        }
        other => Err(taxonomy::evaluation_error(
            format!("right side of `:` must be a list, found `{}`", other.kind()),
            location,
        )),
    }
}

fn logical(op: &str, left: Value, right: Value, location: SourceLocation, f: impl Fn(bool, bool) -> bool) -> Result<Value, SolisError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(f(a, b))),
        (a, b) => Err(taxonomy::unsupported_operator(op, a.kind(), b.kind(), location)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::single(1, 1)
    }

    #[test]
    fn adds_two_ints() {
        let v = eval_binop("+", Value::Int(2), Value::Int(3), loc()).unwrap();
        assert!(matches!(v, Value::Int(5)));
    }

    #[test]
    fn mixed_int_and_bigint_widens_to_bigint() {
        let v = eval_binop("*", Value::Int(2), Value::BigInt(BigInt::from(3)), loc()).unwrap();
        assert!(matches!(v, Value::BigInt(ref b) if *b == BigInt::from(6)));
    }

    #[test]
    fn subtracts_floats() {
        let v = eval_binop("-", Value::Float(2.5), Value::Float(0.5), loc()).unwrap();
        assert!(matches!(v, Value::Float(f) if f == 2.0));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(eval_binop("/", Value::Int(1), Value::Int(0), loc()).is_err());
    }

    #[test]
    fn modulo_by_zero_is_an_error() {
        assert!(eval_binop("%", Value::Int(1), Value::Int(0), loc()).is_err());
    }

    #[test]
    fn less_than_orders_ints() {
        let v = eval_binop("<", Value::Int(1), Value::Int(2), loc()).unwrap();
        assert!(matches!(v, Value::Bool(true)));
    }

    #[test]
    fn string_concat_with_plusplus() {
        let v = eval_binop("++", Value::str("a"), Value::str("b"), loc()).unwrap();
        assert!(matches!(v, Value::Str(ref s) if &**s == "ab"));
    }

    #[test]
    fn cons_prepends_to_list() {
        let v = eval_binop("::", Value::Int(1), Value::list(vec![Value::Int(2)]), loc()).unwrap();
        let Value::List(elements) = v else { panic!("expected list") };
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn cons_rejects_non_list_tail() {
        assert!(eval_binop("::", Value::Int(1), Value::Int(2), loc()).is_err());
    }

    #[test]
    fn logical_and_requires_both_operands_boolean() {
        assert!(eval_binop("&&", Value::Bool(true), Value::Int(1), loc()).is_err());
    }

    #[test]
    fn string_equality_is_structural() {
        let v = eval_binop("==", Value::str("a"), Value::str("a"), loc()).unwrap();
        assert!(matches!(v, Value::Bool(true)));
    }
}
