//! SAT backend port for the covering-set solver.
//!
//! The solver only states clauses and a cardinality bound; how they are
//! decided is left to an adapter.

use varisat::{CnfFormula, Lit, Var};

use crate::Result;

/// Cardinality side condition: at most `bound` of `literals` may be true.
#[derive(Debug, Clone, Copy)]
pub struct AtMost<'a> {
    pub literals: &'a [Lit],
    pub bound: usize,
}

/// Satisfying assignment returned by a backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    assignment: Vec<bool>,
}

impl Model {
    /// Build a model from the literals a solver reports as true.
    ///
    /// Variables missing from `literals` read as false.
    pub fn from_literals(literals: &[Lit]) -> Self {
        let len = literals
            .iter()
            .map(|lit| lit.index() + 1)
            .max()
            .unwrap_or(0);
        let mut assignment = vec![false; len];
        for lit in literals {
            assignment[lit.index()] = lit.is_positive();
        }
        Self { assignment }
    }

    pub fn is_true(&self, var: Var) -> bool {
        self.assignment.get(var.index()).copied().unwrap_or(false)
    }

    pub fn lit_holds(&self, lit: Lit) -> bool {
        self.is_true(lit.var()) == lit.is_positive()
    }
}

/// Port for deciding CNF formulas under an at-most-k bound.
///
/// Every call is independent: implementations must not keep clauses from a
/// previous call around.
pub trait SatBackend {
    /// Decide `formula` together with `at_most`.
    ///
    /// Returns `Ok(None)` when unsatisfiable and the model otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Backend`] when the solver fails, which aborts
    /// any search driving it.
    fn check(&mut self, formula: &CnfFormula, at_most: Option<AtMost<'_>>) -> Result<Option<Model>>;

    /// Number of `check` calls served so far
    fn checks(&self) -> usize;
}
