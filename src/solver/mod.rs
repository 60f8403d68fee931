mod analyze;
mod clauses;
mod decide;
mod heap;
mod propagate;
mod trail;
mod watch;

pub use decide::{ConfigError, Decider};

use crate::formula::{Formula, Literal, Variable};
use crate::{Model, SatResult};
use analyze::{Analysis, Assertion};
use clauses::{dedup, ClauseIdx, ClauseStore};
use decide::Heuristic;
use log::{debug, trace};
use propagate::{BcpResult, Conflict};
use trail::{DecisionLevel, Trail};
use watch::WatchIndex;

/// Counters reported after a solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub decisions: usize,
    /// Root-level facts, propagated literals and post-backtrack assertions.
    pub implications: usize,
    pub conflicts: usize,
    /// Includes unit clauses learned as root-level facts.
    pub learned_clauses: usize,
}

/// A CDCL solver for one formula. Build a new solver to solve another formula.
pub struct Solver {
    num_variables: usize,
    clauses: ClauseStore,
    watches: WatchIndex,
    trail: Trail,
    heuristic: Heuristic,
    stats: Statistics,
    result: Option<SatResult>,
}

/// Driver loop states.
#[derive(Debug)]
enum Step {
    Propagate { from: usize },
    Conflict(Conflict),
    Decide,
    Sat,
    Unsat,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        Self::with_decider(formula, Decider::default())
    }

    /// Loads `formula`. Unit clauses become root-level facts immediately; if two of them
    /// contradict each other, or the formula has an empty clause, the solver is already refuted.
    pub fn with_decider(formula: Formula, decider: Decider) -> Self {
        let num_variables = formula.num_variables();
        let mut solver = Self {
            num_variables,
            clauses: ClauseStore::default(),
            watches: WatchIndex::new(num_variables),
            trail: Trail::new(num_variables),
            heuristic: Heuristic::Ordered,
            stats: Statistics::default(),
            result: None,
        };

        let mut occurrences = vec![0.0; 2 * num_variables + 2];
        for clause in formula.clauses() {
            let literals = dedup(clause.literals().copied());
            debug_assert!(literals.iter().all(|l| l.idx() >= 1));
            match literals.len() {
                0 => {
                    debug!("empty clause in the formula");
                    solver.result = Some(SatResult::Unsatisfiable);
                    break;
                }
                1 => {
                    if !solver.add_root_fact(literals[0]) {
                        solver.result = Some(SatResult::Unsatisfiable);
                        break;
                    }
                }
                _ => {
                    for literal in &literals {
                        occurrences[literal.slot()] += 1.0;
                    }
                    solver.add_watched_clause(literals, false);
                }
            }
        }

        solver.heuristic = Heuristic::new(decider, num_variables, occurrences);
        for entry in solver.trail.entries() {
            solver.heuristic.assigned(entry.variable);
        }
        solver
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of stored clauses, original and learned. Unit clauses are never stored.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn solve(&mut self) -> SatResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        let mut step = Step::Propagate { from: 0 };
        let result = loop {
            step = match step {
                Step::Propagate { from } => match self.bcp(from) {
                    BcpResult::Conflict(conflict) => Step::Conflict(conflict),
                    BcpResult::NoConflict => Step::Decide,
                },
                Step::Conflict(conflict) => match self.analyze_conflict(conflict) {
                    Analysis::Refuted => Step::Unsat,
                    Analysis::Backtrack { level, assertion } => {
                        self.backtrack(level, Some(assertion));
                        Step::Propagate {
                            from: self.trail.len() - 1,
                        }
                    }
                },
                Step::Decide => match self.decide() {
                    Some(_) => Step::Propagate {
                        from: self.trail.len() - 1,
                    },
                    None => Step::Sat,
                },
                Step::Sat => break SatResult::Satisfiable(self.model()),
                Step::Unsat => break SatResult::Unsatisfiable,
            }
        };
        self.result = Some(result.clone());
        result
    }

    /// Applies a unit clause at load time. Returns false if it contradicts an earlier fact.
    fn add_root_fact(&mut self, literal: Literal) -> bool {
        match self.trail.literal_value(literal) {
            Some(value) => {
                if !value {
                    debug!("unit {} contradicts an earlier unit clause", literal);
                }
                value
            }
            None => {
                let entry = self.trail.push(
                    literal.variable(),
                    literal.is_positive(),
                    DecisionLevel::ROOT,
                    None,
                );
                trace!("{}", entry);
                self.stats.implications += 1;
                true
            }
        }
    }

    /// Stores a clause of two or more distinct literals and watches its first two.
    fn add_watched_clause(&mut self, literals: Vec<Literal>, learned: bool) -> ClauseIdx {
        let (first, second) = (literals[0], literals[1]);
        let idx = self.clauses.add(literals, learned);
        self.watches.watch(first, idx);
        self.watches.watch(second, idx);
        idx
    }

    /// Opens a new decision level with the heuristic's choice. `None` means every variable has a value.
    fn decide(&mut self) -> Option<Literal> {
        let literal = self.heuristic.select(&self.trail, self.num_variables)?;
        let level = self.trail.decision_level().next();
        self.trail.set_decision_level(level);
        let entry = self
            .trail
            .push(literal.variable(), literal.is_positive(), level, None);
        trace!("decision {}", entry);
        self.stats.decisions += 1;
        Some(literal)
    }

    /// Undoes every assignment above `level`, then asserts `assertion` (if any) at `level`.
    fn backtrack(&mut self, level: DecisionLevel, assertion: Option<Assertion>) {
        trace!(
            "backtrack: level {} -> {}, trail length {}",
            self.trail.decision_level().0,
            level.0,
            self.trail.len()
        );
        let heuristic = &mut self.heuristic;
        self.trail
            .truncate_above(level, |entry| heuristic.unassigned(entry.variable));
        self.trail.set_decision_level(level);

        if let Some(Assertion { literal, reason }) = assertion {
            let entry = self
                .trail
                .push(literal.variable(), literal.is_positive(), level, reason);
            trace!("asserting {}", entry);
            self.heuristic.assigned(literal.variable());
            self.stats.implications += 1;
        }
    }

    fn model(&self) -> Model {
        Model::new(
            (1..=self.num_variables)
                .map(|v| self.trail.value(Variable(v)).unwrap_or(false))
                .collect(),
        )
    }

    /// Panics if some original clause has both watched literals false.
    #[cfg(test)]
    fn check_watches(&self) {
        for idx in (0..self.clauses.num_original()).map(ClauseIdx) {
            let [first, second] = self.clauses.watched(idx);
            assert!(
                self.trail.literal_value(first) != Some(false)
                    || self.trail.literal_value(second) != Some(false),
                "clause {} has both watches false",
                idx.0
            );
        }
    }
}
