use super::clauses::ClauseIdx;
use super::trail::DecisionLevel;
use super::Solver;
use crate::formula::Literal;
use log::trace;

/// A clause whose literals are all false, found at decision level `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict {
    pub clause: ClauseIdx,
    pub level: DecisionLevel,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub(crate) enum BcpResult {
    Conflict(Conflict),
    NoConflict,
}

impl Solver {
    /// Unit propagation over the two-watched-literal index.
    ///
    /// Processes the trail from position `from` to its end, including entries appended along the
    /// way. Each entry falsifies the negation of its literal, and only clauses watching that
    /// literal are visited.
    pub(crate) fn bcp(&mut self, from: usize) -> BcpResult {
        let mut cursor = from;
        while cursor < self.trail.len() {
            let falsified = self.trail[cursor].literal().negated();
            if let Some(conflict) = self.propagate_literal(falsified) {
                return BcpResult::Conflict(conflict);
            }
            cursor += 1;
        }
        BcpResult::NoConflict
    }

    fn propagate_literal(&mut self, falsified: Literal) -> Option<Conflict> {
        // watch lists change while we walk them
        let watchers: Vec<ClauseIdx> = self.watches.watchers(falsified).iter().rev().copied().collect();

        for clause in watchers {
            let other = self.clauses.other_watch(clause, falsified);
            let other_value = self.trail.literal_value(other);
            if other_value == Some(true) {
                continue;
            }

            if let Some(replacement) = self.find_replacement_watch(clause) {
                trace!("clause {} moves watch {} -> {}", clause.0, falsified, replacement);
                self.clauses.replace_watch(clause, falsified, replacement);
                self.watches.unwatch(falsified, clause);
                self.watches.watch(replacement, clause);
                continue;
            }

            match other_value {
                None => self.imply(other, clause),
                _ => {
                    let level = self.trail.decision_level();
                    trace!("conflict in clause {} at level {}", clause.0, level.0);
                    return Some(Conflict { clause, level });
                }
            }
        }
        None
    }

    /// An unwatched literal of `clause` that is unassigned or true.
    fn find_replacement_watch(&self, clause: ClauseIdx) -> Option<Literal> {
        let watched = self.clauses.watched(clause);
        self.clauses
            .get(clause)
            .iter()
            .filter(|literal| !watched.contains(*literal))
            .find(|literal| self.trail.literal_value(**literal) != Some(false))
            .copied()
    }

    fn imply(&mut self, literal: Literal, reason: ClauseIdx) {
        let level = self.trail.decision_level();
        let entry = self
            .trail
            .push(literal.variable(), literal.is_positive(), level, Some(reason));
        trace!("{}", entry);
        self.heuristic.assigned(literal.variable());
        self.stats.implications += 1;
    }
}
