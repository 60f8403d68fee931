pub mod dimacs;

use crate::Model;
use std::fmt::{self, Display, Formatter};

/// A propositional variable. Variables are numbered from 1, as in DIMACS.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    /// The literal of `variable` that is true when `variable` has `value`.
    pub fn new(variable: Variable, value: bool) -> Self {
        if value {
            Literal::Positive(variable)
        } else {
            Literal::Negative(variable)
        }
    }

    /// Decodes a signed DIMACS literal. `0` is the clause terminator, not a literal.
    pub fn from_dimacs(x: i64) -> Option<Self> {
        if x > 0 {
            Some(Literal::Positive(Variable(x as usize)))
        } else if x < 0 {
            Some(Literal::Negative(Variable(x.unsigned_abs() as usize)))
        } else {
            None
        }
    }

    pub fn to_dimacs(&self) -> i64 {
        match self {
            Literal::Positive(v) => v.0 as i64,
            Literal::Negative(v) => -(v.0 as i64),
        }
    }

    pub fn variable(&self) -> Variable {
        match self {
            Literal::Positive(v) => *v,
            Literal::Negative(v) => *v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn idx(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }

    /// Dense slot for per-literal tables: `2v` for the positive literal, `2v + 1` for the negative one.
    pub(crate) fn slot(&self) -> usize {
        match self {
            Literal::Positive(v) => 2 * v.0,
            Literal::Negative(v) => 2 * v.0 + 1,
        }
    }

    pub(crate) fn from_slot(slot: usize) -> Self {
        let variable = Variable(slot / 2);
        if slot % 2 == 0 {
            Literal::Positive(variable)
        } else {
            Literal::Negative(variable)
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Positive(Variable(x)) => write!(f, "{}", x),
            Literal::Negative(Variable(x)) => write!(f, "!{}", x),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: disjuncts.into_iter().collect(),
        }
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.literals
            .iter()
            .any(|literal| model.value(literal.variable()) == literal.is_positive())
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.literals.len() > 1 {
            f.write_str("(")?;
        }
        let mut first_literal = true;
        for literal in &self.literals {
            if first_literal {
                first_literal = false;
            } else {
                f.write_str(" | ")?;
            }
            write!(f, "{}", literal)?;
        }
        if self.literals.len() > 1 {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Formula {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Formula {
    /// Builds a formula over variables `1..=max`, where `max` is the largest variable mentioned.
    pub fn new(conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        Self::with_num_variables(0, conjuncts)
    }

    /// Builds a formula over at least `num_variables` variables, as declared by a DIMACS header.
    /// Variables that appear in no clause still belong to the formula and receive a value in any model.
    pub fn with_num_variables(num_variables: usize, conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = conjuncts.into_iter().collect();
        let max_variable = clauses
            .iter()
            .flat_map(|clause| clause.literals())
            .map(|literal| literal.idx())
            .max()
            .unwrap_or(0);
        Self {
            num_variables: num_variables.max(max_variable),
            clauses,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(model))
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first_clause = true;
        for clause in &self.clauses {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

/// Random formulas with clauses of one to three literals, small enough for the brute-force oracle.
#[cfg(test)]
pub(crate) fn formula_3sat_strategy() -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    (1usize..=10).prop_flat_map(|num_variables| {
        let literal =
            (1..=num_variables, any::<bool>()).prop_map(|(v, value)| Literal::new(Variable(v), value));
        let clause = proptest::collection::vec(literal, 1..=3).prop_map(|literals| Clause::new(literals));
        proptest::collection::vec(clause, 1..=40)
            .prop_map(move |clauses| Formula::with_num_variables(num_variables, clauses))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimacs_literals() {
        assert_eq!(Literal::from_dimacs(3), Some(p(3)));
        assert_eq!(Literal::from_dimacs(-7), Some(n(7)));
        assert_eq!(Literal::from_dimacs(0), None);
        assert_eq!(n(7).to_dimacs(), -7);
    }

    #[test]
    fn slots_are_dense_and_invertible() {
        assert_eq!(p(1).slot(), 2);
        assert_eq!(n(1).slot(), 3);
        assert_eq!(Literal::from_slot(n(4).slot()), n(4));
        assert_eq!(p(4).negated(), n(4));
    }

    #[test]
    fn num_variables_covers_header_and_clauses() {
        let f = Formula::with_num_variables(5, vec![Clause::new(vec![p(1), n(2)])]);
        assert_eq!(f.num_variables(), 5);

        let f = Formula::with_num_variables(1, vec![Clause::new(vec![p(1), n(9)])]);
        assert_eq!(f.num_variables(), 9);

        assert_eq!(Formula::new(vec![]).num_variables(), 0);
    }

    #[test]
    fn display() {
        let f = Formula::new(vec![Clause::new(vec![p(1), n(2)]), Clause::new(vec![n(3)])]);
        assert_eq!(f.to_string(), "(1 | !2) & !3");
    }

    #[test]
    fn satisfied_by_model() {
        let f = Formula::new(vec![Clause::new(vec![p(1), n(2)]), Clause::new(vec![p(2)])]);
        assert!(f.is_satisfied_by(&Model::new(vec![true, true])));
        assert!(!f.is_satisfied_by(&Model::new(vec![false, true])));
    }
}
