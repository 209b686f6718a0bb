//! The native builtin registry (`print`, `show`, list/string/file
//! primitives, arithmetic predicates), installed into the base environment
//! every program starts with.
//!
//! Grounded on `Interpreter::Interpreter()`'s constructor, which registers
//! each of these directly as a `FunctionValue` closure (curried for the
//! two-argument ones). Argument order follows the original exactly where it
//! registers one: `startsWith`/`endsWith`/`contains`/`split` all take the
//! needle/prefix/suffix/delimiter *first* and the subject *second*
//! (`startsWith prefix str`, not `startsWith str prefix`), matching the
//! signatures already recorded in `solis-typeck`'s builtin table.
//!
//! `even`/`odd`/`abs`/`max`/`min`/`gcd`/`lcm` aren't native primitives in the
//! original interpreter -- they're typed in its prelude, which isn't part of
//! this retrieval. They're implemented here natively instead, in the same
//! registration style as the primitives that are, since no prelude source
//! is available to interpret at startup.

use std::rc::Rc;

use solis_common::SourceLocation;
use solis_errors::{taxonomy, SolisError};

use crate::display;
use crate::env::Env;
use crate::value::{force, Value};

fn expect_str(value: &Value, name: &str, location: SourceLocation) -> Result<Rc<str>, SolisError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(taxonomy::evaluation_error(format!("{name} expects a String, found `{}`", other.kind()), location)),
    }
}

fn expect_list(value: &Value, name: &str, location: SourceLocation) -> Result<Rc<Vec<Value>>, SolisError> {
    match value {
        Value::List(l) => Ok(l.clone()),
        other => Err(taxonomy::evaluation_error(format!("{name} expects a List, found `{}`", other.kind()), location)),
    }
}

fn expect_int(value: &Value, name: &str, location: SourceLocation) -> Result<i64, SolisError> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(taxonomy::evaluation_error(format!("{name} expects an Int, found `{}`", other.kind()), location)),
    }
}

/// The environment every program starts with: every name from the builtin
/// registry, bound to its runtime implementation.
pub fn base_env() -> Env {
    let mut env = Env::empty();

    env = env.extend(
        "print",
        Value::Function(Rc::new(|arg, location| {
            let text = display::render_for_print(&arg, location)?;
            println!("{text}");
            Ok(Value::Bool(true))
        })),
    );
    env = env.extend(
        "show",
        Value::Function(Rc::new(|arg, location| Ok(Value::str(display::render(&arg, location)?)))),
    );

    env = env.extend(
        "neg",
        Value::Function(Rc::new(|arg, location| {
            let forced = force(arg, location)?;
            match forced {
                Value::Int(i) => Ok(Value::Int(-i)),
                Value::Float(f) => Ok(Value::Float(-f)),
                Value::BigInt(b) => Ok(Value::BigInt(-b)),
                other => Err(taxonomy::evaluation_error(format!("neg expects a number, found `{}`", other.kind()), location)),
            }
        })),
    );
    env = env.extend(
        "not",
        Value::Function(Rc::new(|arg, location| {
            let forced = force(arg, location)?;
            match forced {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(taxonomy::evaluation_error(format!("not expects a Bool, found `{}`", other.kind()), location)),
            }
        })),
    );

    env = env.extend(
        "head",
        Value::Function(Rc::new(|arg, location| {
            let list = expect_list(&force(arg, location)?, "head", location)?;
            list.first().cloned().ok_or_else(|| taxonomy::evaluation_error("head of an empty list", location))
        })),
    );
    env = env.extend(
        "tail",
        Value::Function(Rc::new(|arg, location| {
            let list = expect_list(&force(arg, location)?, "tail", location)?;
            if list.is_empty() {
                return Err(taxonomy::evaluation_error("tail of an empty list", location));
            }
            Ok(Value::list(list[1..].to_vec()))
        })),
    );
    env = env.extend(
        "length",
        Value::Function(Rc::new(|arg, location| {
            let list = expect_list(&force(arg, location)?, "length", location)?;
            Ok(Value::Int(list.len() as i64))
        })),
    );

    env = env.extend(
        "words",
        Value::Function(Rc::new(|arg, location| {
            let s = expect_str(&force(arg, location)?, "words", location)?;
            Ok(Value::list(s.split_whitespace().map(Value::str).collect()))
        })),
    );
    env = env.extend(
        "unwords",
        Value::Function(Rc::new(|arg, location| {
            let list = expect_list(&force(arg, location)?, "unwords", location)?;
            let mut parts = Vec::with_capacity(list.len());
            for elem in list.iter() {
                parts.push(expect_str(elem, "unwords", location)?.to_string());
            }
            Ok(Value::str(parts.join(" ")))
        })),
    );
    env = env.extend(
        "lines",
        Value::Function(Rc::new(|arg, location| {
            let s = expect_str(&force(arg, location)?, "lines", location)?;
            let mut out: Vec<Value> = s.split('\n').map(Value::str).collect();
            if s.ends_with('\n') {
                out.pop();
            }
            Ok(Value::list(out))
        })),
    );
    env = env.extend(
        "unlines",
        Value::Function(Rc::new(|arg, location| {
            let list = expect_list(&force(arg, location)?, "unlines", location)?;
            let mut result = String::new();
            for elem in list.iter() {
                result.push_str(&expect_str(elem, "unlines", location)?);
                result.push('\n');
            }
            Ok(Value::str(result))
        })),
    );
    env = env.extend(
        "trim",
        Value::Function(Rc::new(|arg, location| {
            let s = expect_str(&force(arg, location)?, "trim", location)?;
            Ok(Value::str(s.trim_matches(|c: char| " \t\n\r\x0b\x0c".contains(c))))
        })),
    );

    env = env.extend(
        "startsWith",
        curry2("startsWith", |prefix, subject, location| {
            Ok(Value::Bool(subject.starts_with(prefix.as_ref())))
        }),
    );
    env = env.extend(
        "endsWith",
        curry2("endsWith", |suffix, subject, location| {
            let _ = location;
            Ok(Value::Bool(subject.ends_with(suffix.as_ref())))
        }),
    );
    env = env.extend(
        "contains",
        curry2("contains", |needle, haystack, location| {
            let _ = location;
            Ok(Value::Bool(haystack.contains(needle.as_ref())))
        }),
    );
    env = env.extend(
        "split",
        curry2_values("split", |delim, target, location| {
            let delim = expect_str(&delim, "split", location)?;
            let target = expect_str(&target, "split", location)?;
            let parts: Vec<Value> = if delim.is_empty() {
                target.chars().map(|c| Value::str(c.to_string())).collect()
            } else {
                target.split(delim.as_ref()).map(Value::str).collect()
            };
            Ok(Value::list(parts))
        }),
    );

    env = env.extend(
        "readFile",
        Value::Function(Rc::new(|arg, location| {
            let path = expect_str(&force(arg, location)?, "readFile", location)?;
            std::fs::read_to_string(path.as_ref())
                .map(Value::str)
                .map_err(|e| taxonomy::io_failure(format!("readFile: cannot open file '{path}': {e}"), location))
        })),
    );
    env = env.extend(
        "writeFile",
        curry2_values("writeFile", |path, content, location| {
            let path = expect_str(&path, "writeFile", location)?;
            let content = expect_str(&content, "writeFile", location)?;
            std::fs::write(path.as_ref(), content.as_bytes())
                .map(|_| Value::Bool(true))
                .map_err(|e| taxonomy::io_failure(format!("writeFile: cannot open file '{path}': {e}"), location))
        }),
    );
    env = env.extend(
        "appendFile",
        curry2_values("appendFile", |path, content, location| {
            use std::io::Write;
            let path = expect_str(&path, "appendFile", location)?;
            let content = expect_str(&content, "appendFile", location)?;
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path.as_ref())
                .and_then(|mut f| f.write_all(content.as_bytes()))
                .map(|_| Value::Bool(true))
                .map_err(|e| taxonomy::io_failure(format!("appendFile: cannot open file '{path}': {e}"), location))
        }),
    );
    env = env.extend(
        "fileExists",
        Value::Function(Rc::new(|arg, location| {
            let path = expect_str(&force(arg, location)?, "fileExists", location)?;
            Ok(Value::Bool(std::path::Path::new(path.as_ref()).exists()))
        })),
    );
    env = env.extend(
        "deleteFile",
        Value::Function(Rc::new(|arg, location| {
            let path = expect_str(&force(arg, location)?, "deleteFile", location)?;
            let _ = std::fs::remove_file(path.as_ref());
            Ok(Value::Bool(true))
        })),
    );

    env = env.extend(
        "even",
        Value::Function(Rc::new(|arg, location| {
            Ok(Value::Bool(expect_int(&force(arg, location)?, "even", location)? % 2 == 0))
        })),
    );
    env = env.extend(
        "odd",
        Value::Function(Rc::new(|arg, location| {
            Ok(Value::Bool(expect_int(&force(arg, location)?, "odd", location)? % 2 != 0))
        })),
    );
    env = env.extend(
        "abs",
        Value::Function(Rc::new(|arg, location| Ok(Value::Int(expect_int(&force(arg, location)?, "abs", location)?.abs())))),
    );
    env = env.extend(
        "max",
        curry2_int("max", |a, b, _| Ok(Value::Int(a.max(b)))),
    );
    env = env.extend(
        "min",
        curry2_int("min", |a, b, _| Ok(Value::Int(a.min(b)))),
    );
    env = env.extend(
        "gcd",
        curry2_int("gcd", |a, b, _| Ok(Value::Int(gcd(a.abs(), b.abs())))),
    );
    env = env.extend(
        "lcm",
        curry2_int("lcm", |a, b, _location| {
            let g = gcd(a.abs(), b.abs());
            if g == 0 {
                return Ok(Value::Int(0));
            }
            Ok(Value::Int((a / g * b).abs()))
        }),
    );

    env
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn curry2(
    name: &'static str,
    f: impl Fn(Rc<str>, Rc<str>, SourceLocation) -> Result<Value, SolisError> + Clone + 'static,
) -> Value {
    Value::Function(Rc::new(move |first, loc1| {
        let first = expect_str(&force(first, loc1)?, name, loc1)?;
        let f = f.clone();
        Ok(Value::Function(Rc::new(move |second, loc2| {
            let second = expect_str(&force(second.clone(), loc2)?, name, loc2)?;
            f(first.clone(), second, loc2)
        })))
    }))
}

fn curry2_values(
    name: &'static str,
    f: impl Fn(Value, Value, SourceLocation) -> Result<Value, SolisError> + Clone + 'static,
) -> Value {
    let _ = name;
    Value::Function(Rc::new(move |first, loc1| {
        let first = force(first, loc1)?;
        let f = f.clone();
        Ok(Value::Function(Rc::new(move |second, loc2| {
            let second_forced = force(second, loc2)?;
            f(first.clone(), second_forced, loc2)
        })))
    }))
}

fn curry2_int(
    name: &'static str,
    f: impl Fn(i64, i64, SourceLocation) -> Result<Value, SolisError> + Clone + 'static,
) -> Value {
    Value::Function(Rc::new(move |first, loc1| {
        let first = expect_int(&force(first, loc1)?, name, loc1)?;
        let f = f.clone();
        Ok(Value::Function(Rc::new(move |second, loc2| {
            let second = expect_int(&force(second, loc2)?, name, loc2)?;
            f(first, second, loc2)
        })))
    }))
}
