//! Runtime pattern matching, binding names into a fresh [`Env`] as it goes.
//!
//! Grounded on `Interpreter::matchPattern`: forces the scrutinee once per
//! call, then dispatches on the pattern shape. `ConsPat` (`::`) first tries a
//! runtime `ConstructorValue` match (so user-defined nullary/n-ary
//! constructors reuse the same pattern syntax as list cons) and only then
//! falls back to list cons-cell semantics.

use num_bigint::BigInt;
use num_traits::Num;
use solis_common::SourceLocation;
use solis_errors::SolisError;
use solis_parser::ast::{Literal, Pattern};

use crate::env::Env;
use crate::value::{force, Value};

/// Matches `pattern` against `value`, returning the environment extended
/// with every binding the pattern introduces, or `None` if it doesn't match.
pub fn match_pattern(
    pattern: &Pattern,
    value: &Value,
    env: &Env,
    location: SourceLocation,
) -> Result<Option<Env>, SolisError> {
    let forced = force(value.clone(), location)?;
    match pattern {
        Pattern::Var(name, _) => Ok(Some(env.extend(name.clone(), forced))),
        Pattern::Wildcard(_) => Ok(Some(env.clone())),
        Pattern::Lit(lit, _) => Ok(if literal_matches(lit, &forced) { Some(env.clone()) } else { None }),
        Pattern::Cons { ctor, args, .. } => match_cons(ctor, args, &forced, env, location),
        Pattern::List(pats, _) => match_list(pats, &forced, env, location),
        Pattern::Record(fields, _) => match_record(fields, &forced, env, location),
    }
}

fn match_cons(
    ctor: &str,
    args: &[Pattern],
    forced: &Value,
    env: &Env,
    location: SourceLocation,
) -> Result<Option<Env>, SolisError> {
    if let Value::Constructor { name, args: cargs } = forced {
        if &**name != ctor || cargs.len() != args.len() {
            return Ok(None);
        }
        return match_all(args, cargs, env, location);
    }

    if ctor == "::" {
        if let Value::List(elements) = forced {
            if elements.is_empty() || args.len() != 2 {
                return Ok(None);
            }
            let head = &elements[0];
            let tail = Value::list(elements[1..].to_vec());
            let Some(env) = match_pattern(&args[0], head, env, location)? else {
                return Ok(None);
            };
            return match_pattern(&args[1], &tail, &env, location);
        }
    }

    Ok(None)
}

fn match_list(pats: &[Pattern], forced: &Value, env: &Env, location: SourceLocation) -> Result<Option<Env>, SolisError> {
    if let Value::List(elements) = forced {
        if elements.len() != pats.len() {
            return Ok(None);
        }
        return match_all(pats, elements, env, location);
    }
    Ok(None)
}

fn match_record(
    fields: &[(String, Pattern)],
    forced: &Value,
    env: &Env,
    location: SourceLocation,
) -> Result<Option<Env>, SolisError> {
    let Value::Record(record) = forced else {
        return Ok(None);
    };
    let mut current = env.clone();
    for (field, pat) in fields {
        let Some(field_value) = record.get(field) else {
            return Ok(None);
        };
        match match_pattern(pat, field_value, &current, location)? {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn match_all(pats: &[Pattern], values: &[Value], env: &Env, location: SourceLocation) -> Result<Option<Env>, SolisError> {
    let mut current = env.clone();
    for (pat, value) in pats.iter().zip(values.iter()) {
        match match_pattern(pat, value, &current, location)? {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn literal_matches(lit: &Literal, value: &Value) -> bool {
    match (lit, value) {
        (Literal::Int(i), Value::Int(v)) => i == v,
        (Literal::Float(f), Value::Float(v)) => f == v,
        (Literal::Str(s), Value::Str(v)) => s.as_str() == &**v,
        (Literal::Bool(b), Value::Bool(v)) => b == v,
        (Literal::BigInt(digits), Value::BigInt(v)) => {
            BigInt::from_str_radix(digits, 10).map(|parsed| &parsed == v).unwrap_or(false)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis_common::Span;

    fn loc() -> SourceLocation {
        SourceLocation::single(1, 1)
    }

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn var_pattern_always_binds() {
        let env = Env::empty();
        let pat = Pattern::Var("x".into(), span());
        let result = match_pattern(&pat, &Value::Int(5), &env, loc()).unwrap().unwrap();
        assert!(matches!(result.lookup("x"), Some(Value::Int(5))));
    }

    #[test]
    fn wildcard_matches_anything_without_binding() {
        let env = Env::empty();
        let pat = Pattern::Wildcard(span());
        let result = match_pattern(&pat, &Value::Bool(false), &env, loc()).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn literal_pattern_rejects_mismatched_value() {
        let env = Env::empty();
        let pat = Pattern::Lit(Literal::Int(1), span());
        assert!(match_pattern(&pat, &Value::Int(2), &env, loc()).unwrap().is_none());
    }

    #[test]
    fn cons_pattern_splits_head_and_tail() {
        let env = Env::empty();
        let pat = Pattern::Cons {
            ctor: "::".into(),
            args: vec![Pattern::Var("h".into(), span()), Pattern::Var("t".into(), span())],
            span: span(),
        };
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let result = match_pattern(&pat, &list, &env, loc()).unwrap().unwrap();
        assert!(matches!(result.lookup("h"), Some(Value::Int(1))));
        let Some(Value::List(tail)) = result.lookup("t") else { panic!("expected list") };
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn cons_pattern_rejects_empty_list() {
        let env = Env::empty();
        let pat = Pattern::Cons {
            ctor: "::".into(),
            args: vec![Pattern::Var("h".into(), span()), Pattern::Var("t".into(), span())],
            span: span(),
        };
        assert!(match_pattern(&pat, &Value::list(vec![]), &env, loc()).unwrap().is_none());
    }

    #[test]
    fn constructor_pattern_matches_runtime_constructor() {
        let env = Env::empty();
        let pat = Pattern::Cons {
            ctor: "Just".into(),
            args: vec![Pattern::Var("x".into(), span())],
            span: span(),
        };
        let value = Value::Constructor { name: "Just".into(), args: std::rc::Rc::new(vec![Value::Int(7)]) };
        let result = match_pattern(&pat, &value, &env, loc()).unwrap().unwrap();
        assert!(matches!(result.lookup("x"), Some(Value::Int(7))));
    }

    #[test]
    fn constructor_pattern_rejects_name_mismatch() {
        let env = Env::empty();
        let pat = Pattern::Cons { ctor: "Nothing".into(), args: vec![], span: span() };
        let value = Value::Constructor { name: "Just".into(), args: std::rc::Rc::new(vec![Value::Int(7)]) };
        assert!(match_pattern(&pat, &value, &env, loc()).unwrap().is_none());
    }

    #[test]
    fn record_pattern_matches_subset_of_fields() {
        let env = Env::empty();
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("x".to_string(), Value::Int(1));
        fields.insert("y".to_string(), Value::Int(2));
        let value = Value::Record(std::rc::Rc::new(fields));
        let pat = Pattern::Record(vec![("x".into(), Pattern::Var("a".into(), span()))], span());
        let result = match_pattern(&pat, &value, &env, loc()).unwrap().unwrap();
        assert!(matches!(result.lookup("a"), Some(Value::Int(1))));
    }
}
