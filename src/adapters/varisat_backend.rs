//! varisat implementation of the SAT backend port.
//!
//! Each check builds a fresh solver from the formula and appends a
//! sequential-counter encoding of the cardinality bound.

use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

use crate::{
    Result,
    error::Error,
    ports::{AtMost, Model, SatBackend},
};

/// SAT backend driving the varisat CDCL solver
#[derive(Debug, Clone, Default)]
pub struct VarisatBackend {
    checks: usize,
}

impl VarisatBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SatBackend for VarisatBackend {
    fn check(&mut self, formula: &CnfFormula, at_most: Option<AtMost<'_>>) -> Result<Option<Model>> {
        self.checks += 1;

        let mut solver = Solver::new();
        solver.add_formula(formula);

        if let Some(at_most) = at_most {
            let mut counter = CnfFormula::new();
            let mut next_var = formula.var_count();
            encode_at_most(&mut counter, at_most.literals, at_most.bound, || {
                let var = Var::from_index(next_var);
                next_var += 1;
                var
            });
            solver.add_formula(&counter);
        }

        let satisfiable = solver.solve().map_err(|e| Error::Backend {
            message: e.to_string(),
        })?;
        if !satisfiable {
            return Ok(None);
        }

        let literals = solver.model().ok_or(Error::MissingModel)?;
        Ok(Some(Model::from_literals(&literals)))
    }

    fn checks(&self) -> usize {
        self.checks
    }
}

/// Sinz sequential counter for "at most `bound` of `literals`".
///
/// `s[i][j]` holds when at least `j + 1` of the first `i + 1` literals are
/// true. Fresh variables come from `fresh`, which must not collide with any
/// variable of the formula the clauses are added to.
pub(crate) fn encode_at_most(
    formula: &mut CnfFormula,
    literals: &[Lit],
    bound: usize,
    mut fresh: impl FnMut() -> Var,
) {
    let n = literals.len();
    if bound >= n {
        return;
    }
    if bound == 0 {
        for &lit in literals {
            formula.add_clause(&[!lit]);
        }
        return;
    }

    let counters: Vec<Vec<Lit>> = (0..n - 1)
        .map(|_| (0..bound).map(|_| Lit::from_var(fresh(), true)).collect())
        .collect();

    formula.add_clause(&[!literals[0], counters[0][0]]);
    for &s in &counters[0][1..] {
        formula.add_clause(&[!s]);
    }

    for i in 1..n - 1 {
        let x = literals[i];
        let (prev, cur) = (&counters[i - 1], &counters[i]);
        formula.add_clause(&[!x, cur[0]]);
        formula.add_clause(&[!prev[0], cur[0]]);
        for j in 1..bound {
            formula.add_clause(&[!x, !prev[j - 1], cur[j]]);
            formula.add_clause(&[!prev[j], cur[j]]);
        }
        formula.add_clause(&[!x, !prev[bound - 1]]);
    }

    formula.add_clause(&[!literals[n - 1], !counters[n - 2][bound - 1]]);
}
