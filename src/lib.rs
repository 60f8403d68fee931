//! A conflict-driven clause learning (CDCL) SAT solver.
//!
//! ```
//! use cdclsat::{Clause, Decider, Formula, Literal, SatResult, Solver, Variable};
//!
//! let x = |v| Literal::Positive(Variable(v));
//! let f = Formula::new(vec![Clause::new(vec![x(1), x(2)]), Clause::new(vec![x(1).negated()])]);
//!
//! let mut solver = Solver::with_decider(f, Decider::Vsids);
//! match solver.solve() {
//!     SatResult::Satisfiable(model) => assert!(model.value(Variable(2))),
//!     SatResult::Unsatisfiable => unreachable!(),
//! }
//! ```

pub mod formula;
pub mod report;
mod solver;

#[cfg(test)]
mod brute_force;

use std::collections::BTreeMap;

pub use formula::{Clause, Formula, Literal, Variable};
pub use solver::{ConfigError, Decider, Solver, Statistics};

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Model),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SatResult::Satisfiable(model) => Some(model),
            SatResult::Unsatisfiable => None,
        }
    }

    /// The status line for this result: `SAT` or `UNSAT`.
    pub fn status(&self) -> &'static str {
        match self {
            SatResult::Satisfiable(_) => "SAT",
            SatResult::Unsatisfiable => "UNSAT",
        }
    }
}

/// A total assignment of the variables `1..=N`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    /// `values[i]` is the value of variable `i + 1`.
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    pub fn value(&self, variable: Variable) -> bool {
        self.values[variable.0 - 1]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (Variable(i + 1), *value))
    }

    /// The model as a flat JSON object from variable id to value, e.g. `{"1":true,"2":false}`.
    pub fn to_json(&self) -> String {
        let map: BTreeMap<usize, bool> = self.iter().map(|(v, value)| (v.0, value)).collect();
        serde_json::to_string(&map).expect("a map of integers to booleans always serializes")
    }
}
