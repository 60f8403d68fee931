use super::heap::ActivityHeap;
use super::trail::Trail;
use crate::formula::{Literal, Variable};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

// VSIDS bump increment growth, i.e. 1 + 0.75
const INCREMENT_GROWTH: f64 = 1.75;
const RESCALE_LIMIT: f64 = 1e100;

/// Which decision heuristic the solver runs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decider {
    /// Activity-based: pick the most active literal among unassigned variables.
    Vsids,
    /// Static: pick the lowest-numbered unassigned variable and set it true.
    Ordered,
}

impl Default for Decider {
    fn default() -> Self {
        Decider::Vsids
    }
}

impl FromStr for Decider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VSIDS" => Ok(Decider::Vsids),
            "ORDERED" => Ok(Decider::Ordered),
            _ => Err(ConfigError::UnknownDecider(s.to_string())),
        }
    }
}

impl Display for Decider {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Decider::Vsids => f.write_str("VSIDS"),
            Decider::Ordered => f.write_str("ORDERED"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the decider must be one of ORDERED or VSIDS, not {0:?}")]
    UnknownDecider(String),
}

/// Decision state for the configured [`Decider`].
#[derive(Debug)]
pub(crate) enum Heuristic {
    Ordered,
    Vsids(Vsids),
}

impl Heuristic {
    /// `occurrences[l.slot()]` counts the stored original clauses containing `l`.
    pub fn new(decider: Decider, num_variables: usize, occurrences: Vec<f64>) -> Self {
        match decider {
            Decider::Ordered => Heuristic::Ordered,
            Decider::Vsids => Heuristic::Vsids(Vsids::new(num_variables, occurrences)),
        }
    }

    /// The literal to decide next, or `None` once every variable has a value.
    pub fn select(&mut self, trail: &Trail, num_variables: usize) -> Option<Literal> {
        match self {
            Heuristic::Ordered => (1..=num_variables)
                .map(Variable)
                .find(|v| trail.value(*v).is_none())
                .map(Literal::Positive),
            Heuristic::Vsids(vsids) => {
                let literal = vsids.pop_max()?;
                debug_assert!(trail.value(literal.variable()).is_none());
                vsids.heap.remove(literal.negated().slot());
                Some(literal)
            }
        }
    }

    /// `variable` received a value; it is no longer a decision candidate.
    pub fn assigned(&mut self, variable: Variable) {
        if let Heuristic::Vsids(vsids) = self {
            vsids.heap.remove(Literal::Positive(variable).slot());
            vsids.heap.remove(Literal::Negative(variable).slot());
        }
    }

    /// `variable` lost its value on backtrack; both its literals compete again at their stored activity.
    pub fn unassigned(&mut self, variable: Variable) {
        if let Heuristic::Vsids(vsids) = self {
            for literal in [Literal::Positive(variable), Literal::Negative(variable)].iter() {
                let slot = literal.slot();
                vsids.heap.insert_with(slot, vsids.heap.activity(slot));
            }
        }
    }

    /// Bumps every literal of a freshly learned clause.
    pub fn learned(&mut self, clause: &[Literal]) {
        if let Heuristic::Vsids(vsids) = self {
            vsids.bump_all(clause);
        }
    }
}

#[derive(Debug)]
pub(crate) struct Vsids {
    heap: ActivityHeap,
    increment: f64,
}

impl Vsids {
    fn new(num_variables: usize, occurrences: Vec<f64>) -> Self {
        debug_assert_eq!(occurrences.len(), 2 * num_variables + 2);
        let mut heap = ActivityHeap::new(occurrences);
        for v in 1..=num_variables {
            heap.insert(Literal::Positive(Variable(v)).slot());
            heap.insert(Literal::Negative(Variable(v)).slot());
        }
        Self { heap, increment: 1.0 }
    }

    fn pop_max(&mut self) -> Option<Literal> {
        self.heap.pop_max().map(Literal::from_slot)
    }

    fn bump_all(&mut self, clause: &[Literal]) {
        for literal in clause {
            self.heap.bump(literal.slot(), self.increment);
        }
        self.increment *= INCREMENT_GROWTH;

        let overflowing = clause
            .iter()
            .any(|literal| self.heap.activity(literal.slot()) > RESCALE_LIMIT);
        if overflowing || self.increment > RESCALE_LIMIT {
            log::debug!("rescaling literal activities");
            self.heap.rescale(1.0 / RESCALE_LIMIT);
            self.increment /= RESCALE_LIMIT;
        }
    }

    #[cfg(test)]
    pub fn activity(&self, literal: Literal) -> f64 {
        self.heap.activity(literal.slot())
    }

    #[cfg(test)]
    pub fn candidates(&self) -> usize {
        self.heap.len()
    }
}
