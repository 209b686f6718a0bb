//! `Show`-typeclass-style rendering of runtime values.
//!
//! Grounded on `interpreter.cpp`'s two near-duplicate renderers (the free
//! `valToString` used by the `show`/`print` builtins, and the member
//! `Interpreter::valueToString` used elsewhere) -- the former never forced a
//! nested `ThunkValue`, silently printing `<value>` for any unevaluated
//! nested reference, which reads as an oversight rather than a deliberate
//! difference from the latter. This merges them into one renderer that
//! always forces.

use solis_common::SourceLocation;
use solis_errors::SolisError;

use crate::value::{force, Value};

/// Renders a value the way `show`/the REPL would print it: strings quoted,
/// constructor arguments parenthesized when their own rendering contains a
/// space (a syntactic heuristic, not real precedence).
pub fn render(value: &Value, location: SourceLocation) -> Result<String, SolisError> {
    let forced = force(value.clone(), location)?;
    Ok(match forced {
        Value::Str(s) => format!("\"{s}\""),
        Value::Int(i) => i.to_string(),
        Value::BigInt(b) => b.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(elements) => {
            let mut parts = Vec::with_capacity(elements.len());
            for elem in elements.iter() {
                parts.push(render(elem, location)?);
            }
            format!("[{}]", parts.join(", "))
        }
        Value::Record(fields) => {
            let mut parts = Vec::with_capacity(fields.len());
            for (k, v) in fields.iter() {
                parts.push(format!("{k}: {}", render(v, location)?));
            }
            format!("{{ {} }}", parts.join(", "))
        }
        Value::Constructor { name, args } => {
            let mut result = name.to_string();
            for arg in args.iter() {
                let rendered = render(arg, location)?;
                if rendered.contains(' ') && !rendered.starts_with('"') && !rendered.starts_with('[') {
                    result.push_str(&format!(" ({rendered})"));
                } else {
                    result.push_str(&format!(" {rendered}"));
                }
            }
            result
        }
        Value::Function(_) => "<function>".to_string(),
        Value::Thunk(_) => unreachable!("force() never returns an unforced Thunk"),
    })
}

/// Renders a value the way `print` would: a top-level string prints
/// unquoted, everything else matches [`render`].
pub fn render_for_print(value: &Value, location: SourceLocation) -> Result<String, SolisError> {
    let forced = force(value.clone(), location)?;
    if let Value::Str(s) = &forced {
        Ok(s.to_string())
    } else {
        render(&forced, location)
    }
}
