//! Typed names for the boolean variables of a cover formula

use std::collections::HashMap;

use varisat::{CnfFormula, ExtendFormula, Lit, Var};

use super::query::Side;
use crate::tictactoe::NodeId;

/// Meaning of a formula variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoverVar {
    /// Position `node` is reached while playing `side`
    Vertex { side: Side, node: NodeId },
    /// The table plays `mv` at `node` while playing `side`
    Edge { side: Side, node: NodeId, mv: u8 },
    /// `node` is part of the cover for `side` and counts against the bound
    Entry { side: Side, node: NodeId },
}

/// Interns [`CoverVar`]s into dense solver variables
#[derive(Debug, Clone, Default)]
pub struct VariablePool {
    vars: HashMap<CoverVar, Var>,
    names: Vec<CoverVar>,
}

impl VariablePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable for `name`, allocating it in `formula` on first use.
    pub fn intern(&mut self, formula: &mut CnfFormula, name: CoverVar) -> Var {
        if let Some(&var) = self.vars.get(&name) {
            return var;
        }
        let var = formula.new_var();
        debug_assert_eq!(var.index(), self.names.len());
        self.vars.insert(name, var);
        self.names.push(name);
        var
    }

    /// Positive literal for `name`, allocating on first use
    pub fn lit(&mut self, formula: &mut CnfFormula, name: CoverVar) -> Lit {
        Lit::from_var(self.intern(formula, name), true)
    }

    pub fn get(&self, name: CoverVar) -> Option<Var> {
        self.vars.get(&name).copied()
    }

    pub fn name(&self, var: Var) -> Option<CoverVar> {
        self.names.get(var.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable_and_dense() {
        let mut formula = CnfFormula::new();
        let mut pool = VariablePool::new();
        let root = NodeId::from_index(0);
        let child = NodeId::from_index(3);

        let vertex = CoverVar::Vertex { side: Side::ControlledFirst, node: root };
        let other = CoverVar::Vertex { side: Side::AdversaryFirst, node: root };
        let entry = CoverVar::Entry { side: Side::AdversaryFirst, node: child };

        let a = pool.intern(&mut formula, vertex);
        let b = pool.intern(&mut formula, other);
        let c = pool.intern(&mut formula, entry);
        assert_eq!(pool.intern(&mut formula, vertex), a);
        assert_ne!(a, b);
        assert_eq!([a.index(), b.index(), c.index()], [0, 1, 2]);
        assert_eq!(pool.len(), 3);
        assert_eq!(formula.var_count(), 3);
        assert_eq!(pool.name(c), Some(entry));
        assert_eq!(
            pool.get(CoverVar::Entry { side: Side::ControlledFirst, node: child }),
            None
        );
    }
}
