//! Inference-time types, kept separate from [`solis_parser::ast::Type`]
//! (the as-written surface annotation).

use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::FxHashSet;

/// One operator/method obligation produced during inference, e.g. `{op: "+",
/// witness: T -> T -> T}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub op: String,
    pub witness: Ty,
}

/// I-1: ids are unique within a run. I-2: the only way to mutate a type is
/// substitution, which produces a new value. I-3: no `Forall` under a `Fun`
/// on the way to a value. I-4: `Qual` never nests directly under `Qual`.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Var { id: u32, hint: String },
    Con { name: String, args: Vec<Ty> },
    Fun { from: Box<Ty>, to: Box<Ty> },
    Qual { constraints: Vec<Constraint>, body: Box<Ty> },
    Forall { quantified: BTreeSet<u32>, body: Box<Ty> },
}

impl Ty {
    pub fn con(name: impl Into<String>, args: Vec<Ty>) -> Ty {
        Ty::Con { name: name.into(), args }
    }

    pub fn int() -> Ty {
        Ty::con("Int", vec![])
    }

    pub fn bigint() -> Ty {
        Ty::con("BigInt", vec![])
    }

    pub fn float() -> Ty {
        Ty::con("Float", vec![])
    }

    pub fn string() -> Ty {
        Ty::con("String", vec![])
    }

    pub fn bool() -> Ty {
        Ty::con("Bool", vec![])
    }

    pub fn list(elem: Ty) -> Ty {
        Ty::con("List", vec![elem])
    }

    pub fn fun(from: Ty, to: Ty) -> Ty {
        Ty::Fun { from: Box::new(from), to: Box::new(to) }
    }

    /// Builds the right-associated arrow `p1 -> p2 -> ... -> ret`.
    pub fn fun_chain(params: Vec<Ty>, ret: Ty) -> Ty {
        params.into_iter().rev().fold(ret, |acc, p| Ty::fun(p, acc))
    }

    pub fn qual(constraints: Vec<Constraint>, body: Ty) -> Ty {
        if constraints.is_empty() {
            return body;
        }
        Ty::Qual { constraints, body: Box::new(body) }
    }

    pub fn as_list_elem(&self) -> Option<&Ty> {
        match self {
            Ty::Con { name, args } if name == "List" && args.len() == 1 => Some(&args[0]),
            _ => None,
        }
    }
}

pub fn free_vars(ty: &Ty) -> FxHashSet<u32> {
    match ty {
        Ty::Var { id, .. } => FxHashSet::from_iter([*id]),
        Ty::Con { args, .. } => args.iter().flat_map(free_vars).collect(),
        Ty::Fun { from, to } => free_vars(from).into_iter().chain(free_vars(to)).collect(),
        Ty::Qual { constraints, body } => {
            let mut vars = free_vars(body);
            for c in constraints {
                vars.extend(free_vars(&c.witness));
            }
            vars
        }
        Ty::Forall { quantified, body } => {
            let mut vars = free_vars(body);
            for q in quantified {
                vars.remove(q);
            }
            vars
        }
    }
}

/// Collects type variable ids in order of first appearance (for canonical
/// `a, b, c, ...` display naming).
fn collect_vars_in_order(ty: &Ty, order: &mut Vec<u32>, seen: &mut FxHashSet<u32>) {
    match ty {
        Ty::Var { id, .. } => {
            if seen.insert(*id) {
                order.push(*id);
            }
        }
        Ty::Con { args, .. } => {
            for a in args {
                collect_vars_in_order(a, order, seen);
            }
        }
        Ty::Fun { from, to } => {
            collect_vars_in_order(from, order, seen);
            collect_vars_in_order(to, order, seen);
        }
        Ty::Qual { constraints, body } => {
            collect_vars_in_order(body, order, seen);
            for c in constraints {
                collect_vars_in_order(&c.witness, order, seen);
            }
        }
        Ty::Forall { body, .. } => collect_vars_in_order(body, order, seen),
    }
}

fn canonical_name(index: usize) -> String {
    let letter = (b'a' + (index % 26) as u8) as char;
    if index < 26 {
        letter.to_string()
    } else {
        format!("{letter}{}", index / 26)
    }
}

/// Groups constraints by the variable they mention and maps operator sets to
/// the typeclass name a reader would recognize, per the canonical rendering
/// recipe: `{==,<,>}` -> `Ord`, arithmetic -> `Num`, bare `==` -> `Eq`.
fn constraints_to_typeclasses(constraints: &[Constraint], names: &std::collections::HashMap<u32, String>) -> String {
    if constraints.is_empty() {
        return String::new();
    }
    let canonical = |id: &u32, hint: &str| names.get(id).cloned().unwrap_or_else(|| hint.to_string());
    let mut by_var: std::collections::BTreeMap<String, BTreeSet<String>> = Default::default();
    for c in constraints {
        if let Ty::Var { id, hint } = &c.witness {
            by_var.entry(canonical(id, hint)).or_default().insert(c.op.clone());
        } else if let Ty::Fun { from, .. } = &c.witness {
            if let Ty::Var { id, hint } = from.as_ref() {
                by_var.entry(canonical(id, hint)).or_default().insert(c.op.clone());
            }
        }
    }
    let mut parts = Vec::new();
    for (var, ops) in by_var {
        let has_eq = ops.contains("==");
        let has_cmp = ops.contains("<") || ops.contains(">") || ops.contains("<=") || ops.contains(">=");
        let has_arith = ["+", "-", "*", "/", "%"].iter().any(|o| ops.contains(*o));
        if has_cmp && has_eq {
            parts.push(format!("Ord {var}"));
        } else if has_arith {
            parts.push(format!("Num {var}"));
        } else if has_eq {
            parts.push(format!("Eq {var}"));
        } else {
            for op in &ops {
                parts.push(format!("{op} {var}"));
            }
        }
    }
    parts.join(", ")
}

/// Canonical display: remaps variable ids to `a, b, c, ...` in order of first
/// appearance before rendering, so two alpha-equivalent types print
/// identically.
pub fn display_canonical(ty: &Ty) -> String {
    let mut order = Vec::new();
    let mut seen = FxHashSet::default();
    collect_vars_in_order(ty, &mut order, &mut seen);
    let names: std::collections::HashMap<u32, String> =
        order.iter().enumerate().map(|(i, id)| (*id, canonical_name(i))).collect();
    render(ty, &names)
}

fn render(ty: &Ty, names: &std::collections::HashMap<u32, String>) -> String {
    match ty {
        Ty::Var { id, hint } => names.get(id).cloned().unwrap_or_else(|| hint.clone()),
        Ty::Con { name, args } => {
            if args.is_empty() {
                return name.clone();
            }
            if name == "List" && args.len() == 1 {
                return format!("[{}]", render(&args[0], names));
            }
            let mut s = name.clone();
            for a in args {
                s.push(' ');
                s.push_str(&render(a, names));
            }
            s
        }
        Ty::Fun { from, to } => {
            let from_str = render(from, names);
            let from_str = if matches!(from.as_ref(), Ty::Fun { .. }) {
                format!("({from_str})")
            } else {
                from_str
            };
            format!("{from_str} -> {}", render(to, names))
        }
        Ty::Qual { constraints, body } => {
            let classes = constraints_to_typeclasses(constraints, names);
            if classes.is_empty() {
                render(body, names)
            } else {
                format!("{classes} => {}", render(body, names))
            }
        }
        Ty::Forall { quantified, body } => {
            let mut sorted: Vec<_> = quantified.iter().collect();
            sorted.sort();
            let mut s = "forall".to_string();
            for q in sorted {
                let name = names.get(q).cloned().unwrap_or_else(|| q.to_string());
                s.push(' ');
                s.push_str(&name);
            }
            s.push_str(". ");
            s.push_str(&render(body, names));
            s
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_canonical(self))
    }
}
