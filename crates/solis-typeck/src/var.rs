//! Fresh type variable allocation.
//!
//! The original interpreter used a single global counter; here the counter
//! is owned by whichever `TypeInference` session is running, which keeps
//! inference free of global mutable state while still guaranteeing ids are
//! unique within one run (I-1).

use crate::ty::Ty;

#[derive(Debug, Default)]
pub struct TyVarGen {
    next: u32,
}

impl TyVarGen {
    pub fn new() -> Self {
        TyVarGen { next: 0 }
    }

    pub fn fresh(&mut self) -> Ty {
        self.fresh_named("")
    }

    pub fn fresh_named(&mut self, hint: &str) -> Ty {
        let id = self.next;
        self.next += 1;
        let hint = if hint.is_empty() {
            let letter = (b'a' + (id % 26) as u8) as char;
            if id < 26 {
                letter.to_string()
            } else {
                format!("{letter}{}", id / 26)
            }
        } else {
            hint.to_string()
        };
        Ty::Var { id, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_vars_have_increasing_unique_ids() {
        let mut gen = TyVarGen::new();
        let a = gen.fresh();
        let b = gen.fresh();
        let (Ty::Var { id: a_id, .. }, Ty::Var { id: b_id, .. }) = (a, b) else {
            unreachable!()
        };
        assert_ne!(a_id, b_id);
        assert!(b_id > a_id);
    }
}
